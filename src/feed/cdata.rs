use crate::finding::{FindingKind, ValidationFinding};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Checks that CDATA open and close markers occur equally often.
///
/// This is a substring count over the raw text, not a parse, so it runs on
/// content that is not well-formed XML. Only the totals are compared: markers
/// in the wrong order (a close before its open) go undetected.
///
/// # Errors
///
/// Returns a [`FindingKind::CdataMismatch`] finding with `opens`, `closes` and
/// `difference` details when the counts differ.
pub fn check_cdata_sections(content: &str) -> Result<bool, ValidationFinding> {
    let opens = content.matches(CDATA_OPEN).count();
    let closes = content.matches(CDATA_CLOSE).count();

    if opens != closes {
        return Err(
            ValidationFinding::new(FindingKind::CdataMismatch, "CDATA sections mismatch")
                .with_detail("opens", opens)
                .with_detail("closes", closes)
                .with_detail("difference", opens.abs_diff(closes)),
        );
    }

    tracing::debug!(sections = opens, "CDATA markers balanced");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_no_cdata_is_balanced() {
        assert_eq!(check_cdata_sections("<rss><title>plain</title></rss>"), Ok(true));
    }

    #[test]
    fn test_balanced_sections() {
        let content = "<description><![CDATA[<p>a</p>]]></description>\
                       <description><![CDATA[<p>b</p>]]></description>";
        assert_eq!(check_cdata_sections(content), Ok(true));
    }

    #[test]
    fn test_unclosed_section_reported() {
        let err = check_cdata_sections("<d><![CDATA[<p>a</p></d><e><![CDATA[x]]></e>").unwrap_err();
        assert_eq!(err.kind, FindingKind::CdataMismatch);
        assert_eq!(err.message, "CDATA sections mismatch");
        assert_eq!(err.detail("opens"), Some(&json!(2)));
        assert_eq!(err.detail("closes"), Some(&json!(1)));
        assert_eq!(err.detail("difference"), Some(&json!(1)));
    }

    #[test]
    fn test_stray_close_markers_reported() {
        let err = check_cdata_sections("a ]]> b ]]> c ]]>").unwrap_err();
        assert_eq!(err.detail("opens"), Some(&json!(0)));
        assert_eq!(err.detail("closes"), Some(&json!(3)));
        assert_eq!(err.detail("difference"), Some(&json!(3)));
    }

    #[test]
    fn test_order_is_not_checked() {
        // Close before open still balances by count
        assert_eq!(check_cdata_sections("]]> then <![CDATA["), Ok(true));
    }

    proptest! {
        #[test]
        fn prop_difference_matches_counts(opens in 0usize..20, closes in 0usize..20) {
            let mut content = String::from("<rss>");
            for _ in 0..opens {
                content.push_str("<![CDATA[ text ");
            }
            for _ in 0..closes {
                content.push_str(" more ]]>");
            }
            content.push_str("</rss>");

            let result = check_cdata_sections(&content);
            if opens == closes {
                prop_assert_eq!(result, Ok(true));
            } else {
                let err = result.unwrap_err();
                prop_assert_eq!(err.detail("opens"), Some(&json!(opens)));
                prop_assert_eq!(err.detail("closes"), Some(&json!(closes)));
                prop_assert_eq!(err.detail("difference"), Some(&json!(opens.abs_diff(closes))));
            }
        }
    }
}
