use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Password hash digest. Never serialized outward.
    pub hashed_password: Vec<u8>,
    pub about_text: String,
    /// Links in ascending id order. Empty when the user has none.
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub link_name: String,
    pub link_color: String,
    pub link_path: String,
}

/// A link as submitted for creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct LinkInput {
    pub link_name: String,
    #[serde(default)]
    pub link_color: String,
    pub link_path: String,
}

impl LinkInput {
    /// Name and path must both carry something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.link_name.trim().is_empty() && !self.link_path.trim().is_empty()
    }
}

/// Full replacement of an existing link's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct LinkUpdateInput {
    pub link_id: i64,
    pub link_name: String,
    #[serde(default)]
    pub link_color: String,
    pub link_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_fields_are_incomplete() {
        let link = LinkInput {
            link_name: "  ".into(),
            link_color: String::new(),
            link_path: "https://example.com".into(),
        };
        assert!(!link.is_complete());

        let link = LinkInput {
            link_name: "site".into(),
            link_color: String::new(),
            link_path: " \t".into(),
        };
        assert!(!link.is_complete());
    }

    #[test]
    fn color_is_optional() {
        let link: LinkInput =
            serde_json::from_str(r#"{"link_name":"site","link_path":"https://a.dev"}"#).unwrap();
        assert!(link.is_complete());
        assert_eq!(link.link_color, "");
    }
}
