//! Normalize materialized property values into plain strings.

use super::resolve_property::PropertyValue;

/// Status reported when the record has no selected option.
pub const NO_STATUS: &str = "No Status";

/// Title reported when the record has no title text.
pub const NO_TITLE: &str = "No Title";

/// Selected option name of the first item, or [`NO_STATUS`].
pub fn extract_status(value: Option<&PropertyValue>) -> String {
    value
        .and_then(PropertyValue::first)
        .and_then(|item| item.select_name())
        .unwrap_or(NO_STATUS)
        .to_string()
}

/// Plain text of the first title item, or [`NO_TITLE`].
pub fn extract_title(value: Option<&PropertyValue>) -> String {
    value
        .and_then(PropertyValue::first)
        .and_then(|item| item.title_text())
        .unwrap_or(NO_TITLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notion_client::{PropertyItem, RichText, SelectOption};

    fn select_item(name: &str) -> PropertyItem {
        PropertyItem {
            select: Some(SelectOption { name: name.into() }),
            title: None,
        }
    }

    fn title_item(text: &str) -> PropertyItem {
        PropertyItem {
            select: None,
            title: Some(RichText {
                plain_text: text.into(),
            }),
        }
    }

    #[test]
    fn test_missing_values_use_defaults() {
        let empty = PropertyValue::List(vec![]);

        assert_eq!(extract_status(None), NO_STATUS);
        assert_eq!(extract_status(Some(&empty)), NO_STATUS);
        assert_eq!(extract_title(None), NO_TITLE);
        assert_eq!(extract_title(Some(&empty)), NO_TITLE);
    }

    #[test]
    fn test_single_and_list_read_the_same_way() {
        let single = PropertyValue::Single(select_item("Done"));
        let list = PropertyValue::List(vec![select_item("Done"), select_item("Todo")]);

        assert_eq!(extract_status(Some(&single)), "Done");
        assert_eq!(extract_status(Some(&list)), "Done");
    }

    #[test]
    fn test_title_reads_first_fragment_only() {
        let list = PropertyValue::List(vec![title_item("Ship "), title_item("release")]);

        assert_eq!(extract_title(Some(&list)), "Ship ");
    }

    #[test]
    fn test_wrong_item_kind_falls_back() {
        let status_as_title = PropertyValue::Single(title_item("Oops"));
        let title_as_status = PropertyValue::List(vec![select_item("Done")]);

        assert_eq!(extract_status(Some(&status_as_title)), NO_STATUS);
        assert_eq!(extract_title(Some(&title_as_status)), NO_TITLE);
    }
}
