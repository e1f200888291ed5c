//! Host-facing property surface.
//!
//! The host delivers loosely typed values keyed by property name; [`Prop`]
//! is the typed form components consume. A `None` payload means the host sent
//! null, which resets the property to its default.

use crate::error::PropError;

/// A raw value as delivered by the host's property binding layer.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One typed property update.
#[derive(Clone, Debug, PartialEq)]
pub enum Prop {
    Text(Option<String>),
    FontSize(Option<f32>),
    StrokeWidth(Option<f32>),
    Color(Option<String>),
    StrokeColor(Option<String>),
    FontFamily(Option<String>),
    Align(Option<String>),
    NumberOfLines(Option<i32>),
    Ellipsis(Option<bool>),
    Width(Option<f32>),
}

impl Prop {
    pub const NAMES: [&'static str; 10] = [
        "text",
        "fontSize",
        "strokeWidth",
        "color",
        "strokeColor",
        "fontFamily",
        "align",
        "numberOfLines",
        "ellipsis",
        "width",
    ];

    pub fn from_raw(name: &str, value: PropValue) -> Result<Self, PropError> {
        let prop = match name {
            "text" => Self::Text(string("text", value)?),
            "fontSize" => Self::FontSize(float("fontSize", value)?),
            "strokeWidth" => Self::StrokeWidth(float("strokeWidth", value)?),
            "color" => Self::Color(string("color", value)?),
            "strokeColor" => Self::StrokeColor(string("strokeColor", value)?),
            "fontFamily" => Self::FontFamily(string("fontFamily", value)?),
            "align" => Self::Align(string("align", value)?),
            "numberOfLines" => Self::NumberOfLines(int("numberOfLines", value)?),
            "ellipsis" => Self::Ellipsis(boolean("ellipsis", value)?),
            "width" => Self::Width(float("width", value)?),
            other => return Err(PropError::UnknownProp(other.to_string())),
        };
        Ok(prop)
    }

    /// Like [`Prop::from_raw`], but logs and discards a rejected update.
    pub fn from_raw_lossy(name: &str, value: PropValue) -> Option<Self> {
        Self::from_raw(name, value)
            .inspect_err(|e| log::warn!("Ignoring property update: {e}"))
            .ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::FontSize(_) => "fontSize",
            Self::StrokeWidth(_) => "strokeWidth",
            Self::Color(_) => "color",
            Self::StrokeColor(_) => "strokeColor",
            Self::FontFamily(_) => "fontFamily",
            Self::Align(_) => "align",
            Self::NumberOfLines(_) => "numberOfLines",
            Self::Ellipsis(_) => "ellipsis",
            Self::Width(_) => "width",
        }
    }
}

fn string(name: &'static str, value: PropValue) -> Result<Option<String>, PropError> {
    match value {
        PropValue::Null => Ok(None),
        PropValue::Str(s) => Ok(Some(s)),
        _ => Err(PropError::TypeMismatch {
            name,
            expected: "string",
        }),
    }
}

fn float(name: &'static str, value: PropValue) -> Result<Option<f32>, PropError> {
    match value {
        PropValue::Null => Ok(None),
        PropValue::Float(v) => Ok(Some(v as f32)),
        PropValue::Int(v) => Ok(Some(v as f32)),
        _ => Err(PropError::TypeMismatch {
            name,
            expected: "number",
        }),
    }
}

fn int(name: &'static str, value: PropValue) -> Result<Option<i32>, PropError> {
    match value {
        PropValue::Null => Ok(None),
        PropValue::Int(v) => Ok(Some(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)),
        PropValue::Float(v) if v.is_finite() => Ok(Some(v as i32)),
        _ => Err(PropError::TypeMismatch {
            name,
            expected: "integer",
        }),
    }
}

fn boolean(name: &'static str, value: PropValue) -> Result<Option<bool>, PropError> {
    match value {
        PropValue::Null => Ok(None),
        PropValue::Bool(b) => Ok(Some(b)),
        _ => Err(PropError::TypeMismatch {
            name,
            expected: "boolean",
        }),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_parses_null() {
        for name in Prop::NAMES {
            let prop = Prop::from_raw(name, PropValue::Null).unwrap();
            assert_eq!(prop.name(), name);
        }
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(
            Prop::from_raw("text", "hello".into()).unwrap(),
            Prop::Text(Some("hello".into()))
        );
        assert_eq!(
            Prop::from_raw("fontSize", 18i64.into()).unwrap(),
            Prop::FontSize(Some(18.0))
        );
        assert_eq!(
            Prop::from_raw("numberOfLines", 2.0f64.into()).unwrap(),
            Prop::NumberOfLines(Some(2))
        );
        assert_eq!(
            Prop::from_raw("ellipsis", true.into()).unwrap(),
            Prop::Ellipsis(Some(true))
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            Prop::from_raw("shadow", PropValue::Null),
            Err(PropError::UnknownProp("shadow".into()))
        );
        assert!(matches!(
            Prop::from_raw("ellipsis", "yes".into()),
            Err(PropError::TypeMismatch { name: "ellipsis", .. })
        ));
        assert!(matches!(
            Prop::from_raw("fontSize", PropValue::Bool(true)),
            Err(PropError::TypeMismatch { .. })
        ));
    }
}
