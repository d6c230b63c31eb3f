//! List response shapes
//!
//! Depending on the backend version, list endpoints answer with either a
//! bare JSON array or a paginated object. [`ListPayload`] accepts both and
//! normalizes to [`Page`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(alias = "list", alias = "records")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Paginated(Page<T>),
}

impl<T> ListPayload<T> {
    /// A bare array is treated as a single complete page.
    pub fn into_page(self) -> Page<T> {
        match self {
            ListPayload::Items(items) => Page {
                total: Some(items.len() as u64),
                items,
                page: None,
                page_size: None,
            },
            ListPayload::Paginated(page) => page,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Paginated(page) => page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let payload: ListPayload<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        let page = payload.into_page();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, Some(3));
        assert!(page.page.is_none());
    }

    #[test]
    fn test_paginated_object() {
        let json = r#"{"items": [7], "total": 41, "page": 2, "page_size": 20}"#;
        let payload: ListPayload<u32> = serde_json::from_str(json).unwrap();
        let page = payload.into_page();
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.total, Some(41));
        assert_eq!(page.page, Some(2));
        assert_eq!(page.page_size, Some(20));
    }

    #[test]
    fn test_paginated_aliases() {
        let payload: ListPayload<u32> = serde_json::from_str(r#"{"list": [1]}"#).unwrap();
        assert_eq!(payload.into_items(), vec![1]);

        let payload: ListPayload<u32> = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(payload.into_page().is_empty());
    }

    #[test]
    fn test_unrecognized_shape_fails() {
        let result: Result<ListPayload<u32>, _> = serde_json::from_str(r#"{"total": 3}"#);
        assert!(result.is_err());
    }
}
