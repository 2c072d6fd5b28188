//! The argument node type and its flattening rule.

use crate::args::composite::Arguments;
use crate::args::file::{FileExport, Profile};
use crate::args::profileset::ProfileSet;
use crate::args::value::KeyValue;

/// One node of a simc argument tree.
///
/// Every node renders into zero or more command-line tokens. Containers
/// render their children left to right, so the flattened order always
/// matches insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Opaque token passed through untouched.
    Literal(String),
    KeyValue(KeyValue),
    Profile(Profile),
    Export(FileExport),
    Composite(Arguments),
    ProfileSet(ProfileSet),
}

impl Arg {
    /// Append this node's tokens to `prefix` and return the extended list.
    pub fn render(&self, mut prefix: Vec<String>) -> Vec<String> {
        match self {
            Self::Literal(token) => prefix.push(token.clone()),
            Self::KeyValue(kv) => prefix.push(kv.token()),
            Self::Profile(profile) => prefix.push(profile.path()),
            Self::Export(export) => prefix.push(export.token()),
            Self::Composite(args) => return args.render(prefix),
            Self::ProfileSet(set) => return set.render(prefix),
        }
        prefix
    }

    /// Tokens produced by this node alone.
    pub fn tokens(&self) -> Vec<String> {
        self.render(Vec::new())
    }
}

impl From<&str> for Arg {
    fn from(token: &str) -> Self {
        Self::Literal(token.to_string())
    }
}

impl From<String> for Arg {
    fn from(token: String) -> Self {
        Self::Literal(token)
    }
}

impl From<KeyValue> for Arg {
    fn from(kv: KeyValue) -> Self {
        Self::KeyValue(kv)
    }
}

impl From<Profile> for Arg {
    fn from(profile: Profile) -> Self {
        Self::Profile(profile)
    }
}

impl From<FileExport> for Arg {
    fn from(export: FileExport) -> Self {
        Self::Export(export)
    }
}

impl From<Arguments> for Arg {
    fn from(args: Arguments) -> Self {
        Self::Composite(args)
    }
}

impl From<ProfileSet> for Arg {
    fn from(set: ProfileSet) -> Self {
        Self::ProfileSet(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_appends_after_prefix() {
        let prefix = vec!["first".to_string()];
        let out = Arg::from("second").render(prefix);
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn render_is_repeatable() {
        let arg = Arg::from(KeyValue::new("iterations", 10));
        assert_eq!(arg.tokens(), arg.tokens());
        assert_eq!(arg.tokens(), vec!["iterations=10"]);
    }

    #[test]
    fn empty_composite_renders_nothing() {
        let prefix = vec!["keep".to_string()];
        assert_eq!(Arg::from(Arguments::new()).render(prefix), vec!["keep"]);
    }
}
