use std::fmt;

/// An opaque token that scopes a conversation to a backend-tracked lead.
///
/// A `LeadId` is never empty. Surrounding whitespace is not part of the
/// identifier, so `"  "` is treated the same as a missing one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LeadId(String);

impl LeadId {
    /// Parses a raw value, returning `None` if it is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LeadId").field(&self.0).finish()
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(LeadId::parse(" lead-7 \n").unwrap().as_str(), "lead-7");
        assert!(LeadId::parse("").is_none());
        assert!(LeadId::parse(" \t ").is_none());
    }
}
