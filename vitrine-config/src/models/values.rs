//! Scalar option values that accept more than one spelling in config files.
//!
//! Carousel markup historically mixed numbers and keywords for the same
//! option (`start_position = 2` vs `start_position = "url_hash"`), and
//! breakpoint tables are keyed by strings in TOML but by numbers in code.
//! The visitors below accept both forms.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Where the carousel starts after items are (re)placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Relative item index.
    Index(isize),
    /// Resolve from the host's URL fragment (handled by the hash plugin).
    UrlHash,
}

impl Default for StartPosition {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl StartPosition {
    /// Numeric start index, or `None` for anchor-based starts.
    pub fn index(self) -> Option<isize> {
        match self {
            Self::Index(i) => Some(i),
            Self::UrlHash => None,
        }
    }
}

impl Serialize for StartPosition {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(i) => serializer.serialize_i64(*i as i64),
            Self::UrlHash => serializer.serialize_str("url_hash"),
        }
    }
}

impl<'de> Deserialize<'de> for StartPosition {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct StartVisitor;

        impl Visitor<'_> for StartVisitor {
            type Value = StartPosition;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an item index or \"url_hash\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(StartPosition::Index(v as isize))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(StartPosition::Index(v as isize))
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                match v.trim() {
                    "url_hash" | "URLHash" => Ok(StartPosition::UrlHash),
                    other => other
                        .parse::<isize>()
                        .map(StartPosition::Index)
                        .map_err(|_| {
                        E::invalid_value(de::Unexpected::Str(v), &self)
                    }),
                }
            }
        }

        deserializer.deserialize_any(StartVisitor)
    }
}

/// How far navigation controls move per click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideBy {
    /// Fixed item count.
    Items(u32),
    /// One page of `items`.
    Page,
}

impl Default for SlideBy {
    fn default() -> Self {
        Self::Items(1)
    }
}

impl Serialize for SlideBy {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self {
            Self::Items(n) => serializer.serialize_u32(*n),
            Self::Page => serializer.serialize_str("page"),
        }
    }
}

impl<'de> Deserialize<'de> for SlideBy {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct SlideByVisitor;

        impl Visitor<'_> for SlideByVisitor {
            type Value = SlideBy;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive item count or \"page\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(SlideBy::Items)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Unsigned(v), &self)
                    })
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(SlideBy::Items)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Signed(v), &self)
                    })
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                match v.trim() {
                    "page" => Ok(SlideBy::Page),
                    other => other
                        .parse::<u32>()
                        .map(SlideBy::Items)
                        .map_err(|_| {
                        E::invalid_value(de::Unexpected::Str(v), &self)
                    }),
                }
            }
        }

        deserializer.deserialize_any(SlideByVisitor)
    }
}

/// Viewport width threshold (pixels) above which an override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Breakpoint(pub u32);

impl Breakpoint {
    /// Threshold as a pixel width.
    pub fn width(self) -> f32 {
        self.0 as f32
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Breakpoint {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

// Map keys must be strings in both TOML and JSON.
impl Serialize for Breakpoint {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Breakpoint {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct BreakpointVisitor;

        impl Visitor<'_> for BreakpointVisitor {
            type Value = Breakpoint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative viewport width in pixels")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(Breakpoint)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Unsigned(v), &self)
                    })
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(Breakpoint)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Signed(v), &self)
                    })
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                v.trim()
                    .parse::<u32>()
                    .map(Breakpoint)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Str(v), &self)
                    })
            }
        }

        deserializer.deserialize_any(BreakpointVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_accepts_numbers_and_keyword() {
        let idx: StartPosition = serde_json::from_str("4").unwrap();
        assert_eq!(idx, StartPosition::Index(4));
        let hash: StartPosition = serde_json::from_str("\"url_hash\"").unwrap();
        assert_eq!(hash, StartPosition::UrlHash);
        let quoted: StartPosition = serde_json::from_str("\"-1\"").unwrap();
        assert_eq!(quoted, StartPosition::Index(-1));
        assert!(serde_json::from_str::<StartPosition>("\"middle\"").is_err());
    }

    #[test]
    fn slide_by_page_keyword() {
        let page: SlideBy = serde_json::from_str("\"page\"").unwrap();
        assert_eq!(page, SlideBy::Page);
        let two: SlideBy = serde_json::from_str("2").unwrap();
        assert_eq!(two, SlideBy::Items(2));
        assert!(serde_json::from_str::<SlideBy>("-3").is_err());
    }

    #[test]
    fn breakpoint_serializes_as_string_key() {
        let json = serde_json::to_string(&Breakpoint(600)).unwrap();
        assert_eq!(json, "\"600\"");
    }
}
