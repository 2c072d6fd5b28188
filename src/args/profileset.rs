//! Named profile sets (`profileset.<name>=...`).

use crate::args::composite::Arguments;
use crate::args::error::ArgError;
use crate::args::owner::ArgumentOwner;

/// A group of arguments rendered under `profileset.<name>`.
///
/// The first flattened token is assigned with `=`, every following token
/// is appended with `+=`. The operator depends only on the token position,
/// not on which child produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    name: String,
    args: Arguments,
}

impl ProfileSet {
    /// Create an empty set. Names containing `"` are rejected because simc
    /// offers no way to escape them.
    pub fn new(name: impl Into<String>) -> Result<Self, ArgError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ArgError::EmptyName);
        }
        if name.contains('"') {
            return Err(ArgError::QuotedName { name });
        }
        Ok(Self {
            name,
            args: Arguments::new(),
        })
    }

    /// Create a set holding `args`.
    pub fn with_args(name: impl Into<String>, args: Arguments) -> Result<Self, ArgError> {
        let mut set = Self::new(name)?;
        set.args = args;
        Ok(set)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> String {
        if self.name.contains(' ') {
            format!("profileset.\"{}\"", self.name)
        } else {
            format!("profileset.{}", self.name)
        }
    }

    pub fn render(&self, mut prefix: Vec<String>) -> Vec<String> {
        let key = self.key();
        for (i, token) in self.args.flattened().into_iter().enumerate() {
            let op = if i == 0 { "=" } else { "+=" };
            prefix.push(format!("{key}{op}{token}"));
        }
        prefix
    }
}

impl ArgumentOwner for ProfileSet {
    fn arguments(&self) -> &Arguments {
        &self.args
    }

    fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }
}
