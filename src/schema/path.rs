//! Key paths into a JSON document

use std::fmt;

/// One step of a [`KeyPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member
    Key(String),
    /// Any element of a list
    Item,
}

/// Location of a value inside the document, rendered as `a.b[].c`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    pub fn item(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Item);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Object keys only, outermost first
    pub fn keys(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Key(key) => Some(key.as_str()),
                Segment::Item => None,
            })
            .collect()
    }

    /// Number of object keys above the value; top-level keys are depth 0
    pub fn depth(&self) -> usize {
        self.keys().len().saturating_sub(1)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path ends in a list element
    pub fn is_item(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Item))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Item => f.write_str("[]")?,
            }
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(KeyPath::root().to_string(), "<root>");
        let path = KeyPath::root().child("servers").item().child("tls");
        assert_eq!(path.to_string(), "servers[].tls");
        assert_eq!(path.keys(), vec!["servers", "tls"]);
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_top_level_depth() {
        let path = KeyPath::root().child("database");
        assert_eq!(path.depth(), 0);
        assert!(!path.is_item());
        assert!(path.item().is_item());
    }
}
