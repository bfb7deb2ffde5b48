use crate::{errors::ApiError, http::ApiResponder};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub enabled: bool,
    pub category: Vec<String>,
}

impl ApiResponder for Channel {
    fn unit() -> &'static str {
        "channel"
    }
    fn article() -> &'static str {
        "A"
    }
}

impl Channel {
    /// Applies every field present in `patch`, keeping the rest. The id is
    /// never touched.
    #[cfg_attr(all(feature = "postgres", not(test)), allow(dead_code))]
    pub fn merge(mut self, patch: ChannelPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(logo_url) = patch.logo_url {
            self.logo_url = logo_url;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }

        self
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelCreateData {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Defaults to `true`.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub category: Vec<String>,
}

impl ChannelCreateData {
    pub fn into_channel(self) -> Result<Channel, ApiError> {
        Ok(Channel {
            id: self.id,
            name: not_blank("name", self.name)?,
            url: not_blank("url", self.url)?,
            logo_url: self.logo_url,
            enabled: self.enabled.unwrap_or(true),
            category: self.category,
        })
    }
}

/// The raw update body. Every field keeps the difference between being
/// absent (`None`) and being sent as `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelUpdateData {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>, nullable)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<bool>)]
    pub enabled: Option<Option<bool>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Vec<String>>)]
    pub category: Option<Option<Vec<String>>>,
}

fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated sparse change set. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo_url: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub category: Option<Vec<String>>,
}

impl TryFrom<ChannelUpdateData> for ChannelPatch {
    type Error = ApiError;

    fn try_from(data: ChannelUpdateData) -> Result<Self, Self::Error> {
        Ok(Self {
            id: data.id,
            name: non_null("name", data.name)?
                .map(|v| not_blank("name", v))
                .transpose()?,
            url: non_null("url", data.url)?
                .map(|v| not_blank("url", v))
                .transpose()?,
            logo_url: data.logo_url,
            enabled: non_null("enabled", data.enabled)?,
            category: non_null("category", data.category)?,
        })
    }
}

#[inline]
fn non_null<T>(field: &'static str, value: Option<Option<T>>) -> Result<Option<T>, ApiError> {
    match value {
        Some(None) => Err(ApiError::InvalidField {
            field,
            reason: "must not be null",
        }),
        Some(Some(v)) => Ok(Some(v)),
        None => Ok(None),
    }
}

#[inline]
fn not_blank(field: &'static str, value: String) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidField {
            field,
            reason: "must not be blank",
        });
    }

    Ok(value)
}

/// The only predicate the store is ever queried with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    pub enabled: Option<bool>,
}

impl ChannelFilter {
    #[inline]
    pub fn enabled_only() -> Self {
        Self {
            enabled: Some(true),
        }
    }

    #[inline]
    pub fn matches(&self, channel: &Channel) -> bool {
        self.enabled.map_or(true, |e| channel.enabled == e)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelIdPathParams {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletionResponseBody {
    pub message: String,
}

impl ApiResponder for DeletionResponseBody {
    fn unit() -> &'static str {
        "deletion confirmation"
    }
    fn article() -> &'static str {
        "A"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news() -> Channel {
        Channel {
            id: 1,
            name: "News".into(),
            url: "http://x/1".into(),
            logo_url: Some("http://x/1.png".into()),
            enabled: true,
            category: vec!["news".into(), "24h".into()],
        }
    }

    fn parse_patch(json: &str) -> Result<ChannelPatch, ApiError> {
        let data: ChannelUpdateData = serde_json::from_str(json).unwrap();
        ChannelPatch::try_from(data)
    }

    #[test]
    fn test_create_defaults() {
        let data: ChannelCreateData =
            serde_json::from_str(r#"{"id":7,"name":"Sports","url":"http://x/7"}"#).unwrap();
        let chan = data.into_channel().unwrap();

        assert!(chan.enabled);
        assert!(chan.category.is_empty());
        assert_eq!(chan.logo_url, None);
    }

    #[test]
    fn test_create_requires_fields() {
        let missing_url = serde_json::from_str::<ChannelCreateData>(r#"{"id":7,"name":"A"}"#);
        assert!(missing_url.is_err());

        let string_id =
            serde_json::from_str::<ChannelCreateData>(r#"{"id":"7","name":"A","url":"u"}"#);
        assert!(string_id.is_err());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let data: ChannelCreateData =
            serde_json::from_str(r#"{"id":7,"name":"  ","url":"http://x/7"}"#).unwrap();

        match data.into_channel() {
            Err(ApiError::InvalidField { field, .. }) => assert_eq!(field, "name"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let mut chan = news();
        chan.logo_url = None;

        let value = serde_json::to_value(&chan).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 5);
        assert_eq!(value["category"], serde_json::json!(["news", "24h"]));

        let value = serde_json::to_value(news()).unwrap();
        assert_eq!(value["logoUrl"], "http://x/1.png");
    }

    #[test]
    fn test_update_distinguishes_absent_and_falsy() {
        let patch = parse_patch(r#"{"enabled":false,"category":[]}"#).unwrap();

        assert_eq!(patch.enabled, Some(false));
        assert_eq!(patch.category, Some(vec![]));
        assert_eq!(patch.name, None);
        assert_eq!(patch.logo_url, None);
    }

    #[test]
    fn test_update_null_logo_clears_it() {
        let patch = parse_patch(r#"{"logoUrl":null}"#).unwrap();
        assert_eq!(patch.logo_url, Some(None));

        let merged = news().merge(patch);
        assert_eq!(merged.logo_url, None);
        assert_eq!(merged.name, "News");
    }

    #[test]
    fn test_update_null_required_field_is_invalid() {
        for body in [r#"{"name":null}"#, r#"{"enabled":null}"#, r#"{"category":null}"#] {
            assert!(matches!(
                parse_patch(body),
                Err(ApiError::InvalidField {
                    reason: "must not be null",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_update_wrong_type_is_rejected() {
        assert!(serde_json::from_str::<ChannelUpdateData>(r#"{"enabled":"no"}"#).is_err());
        assert!(serde_json::from_str::<ChannelUpdateData>(r#"{"category":"news"}"#).is_err());
        assert!(serde_json::from_str::<ChannelUpdateData>(r#"{"bogus":1}"#).is_err());
    }

    #[test]
    fn test_merge_preserves_unspecified_fields() {
        let original = news();
        let patch = ChannelPatch {
            url: Some("http://y/1".into()),
            ..Default::default()
        };

        let merged = original.clone().merge(patch);

        assert_eq!(merged.url, "http://y/1");
        assert_eq!(merged.id, original.id);
        assert_eq!(merged.name, original.name);
        assert_eq!(merged.logo_url, original.logo_url);
        assert_eq!(merged.enabled, original.enabled);
        assert_eq!(merged.category, original.category);
    }

    #[test]
    fn test_merge_ignores_patch_id() {
        let patch = ChannelPatch {
            id: Some(99),
            ..Default::default()
        };

        assert_eq!(news().merge(patch), news());
    }

    #[test]
    fn test_filter() {
        let mut disabled = news();
        disabled.enabled = false;

        assert!(ChannelFilter::enabled_only().matches(&news()));
        assert!(!ChannelFilter::enabled_only().matches(&disabled));
        assert!(ChannelFilter::default().matches(&disabled));
    }
}
