use super::document::{Document, NodeId};
use super::error::CompileError;

/// One resource limit from a `--ulimit name=soft:hard` flag value.
///
/// Docker's run flag packs both limits into a single token; compose wants
/// them as a nested `name: {soft, hard}` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ulimit {
    pub name: String,
    pub soft: i64,
    pub hard: i64,
}

impl Ulimit {
    /// Parse the exact form `name=soft:hard` with base-10 integer limits.
    pub fn parse(s: &str) -> Result<Self, CompileError> {
        let invalid = || CompileError::InvalidUlimitValue(s.to_string());

        if s.is_empty() {
            return Err(invalid());
        }

        let (name, limits) = s.split_once('=').ok_or_else(invalid)?;
        if limits.contains('=') {
            return Err(invalid());
        }

        let (soft, hard) = limits.split_once(':').ok_or_else(invalid)?;
        if hard.contains(':') {
            return Err(invalid());
        }

        let soft: i64 = soft.parse().map_err(|_| invalid())?;
        let hard: i64 = hard.parse().map_err(|_| invalid())?;

        Ok(Self {
            name: name.to_string(),
            soft,
            hard,
        })
    }

    /// Append this limit to `parent` as a `name: {soft, hard}` pair and
    /// return the value node.
    pub fn attach(&self, doc: &mut Document, parent: NodeId) -> NodeId {
        let key = doc.scalar(&self.name);
        let value = doc.mapping();
        let soft_key = doc.scalar("soft");
        let soft_val = doc.scalar(self.soft.to_string());
        doc.push_pair(value, soft_key, soft_val);
        let hard_key = doc.scalar("hard");
        let hard_val = doc.scalar(self.hard.to_string());
        doc.push_pair(value, hard_key, hard_val);
        doc.push_pair(parent, key, value);
        value
    }
}
