//! Ordered, flattening container of argument nodes.

use crate::args::node::Arg;
use crate::args::value::{KeyValue, Value};

/// An ordered list of [`Arg`] nodes.
///
/// Children are never dropped or reordered; [`Arguments::flattened`] walks
/// them in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    children: Vec<Arg>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional children first, then one `key=value` node per named entry.
    pub fn from_parts<P, K, V>(positional: P, named: impl IntoIterator<Item = (K, V)>) -> Self
    where
        P: IntoIterator,
        P::Item: Into<Arg>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut args: Self = positional.into_iter().map(Into::<Arg>::into).collect();
        for (key, value) in named {
            args.push_named(key, value);
        }
        args
    }

    /// Append a child and return `self` for chaining.
    pub fn add(mut self, child: impl Into<Arg>) -> Self {
        self.push(child);
        self
    }

    /// Append a `key=value` child and return `self` for chaining.
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_named(key, value);
        self
    }

    pub fn push(&mut self, child: impl Into<Arg>) {
        self.children.push(child.into());
    }

    pub fn push_named(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.children.push(Arg::KeyValue(KeyValue::new(key, value)));
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.children.iter()
    }

    pub fn render(&self, prefix: Vec<String>) -> Vec<String> {
        self.children
            .iter()
            .fold(prefix, |tokens, child| child.render(tokens))
    }

    pub fn flattened(&self) -> Vec<String> {
        self.render(Vec::new())
    }
}

impl FromIterator<Arg> for Arguments {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl Extend<Arg> for Arguments {
    fn extend<I: IntoIterator<Item = Arg>>(&mut self, iter: I) {
        self.children.extend(iter);
    }
}

impl IntoIterator for Arguments {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
