use std::collections::HashMap;

use log::{debug, warn};

use super::document::{Document, NodeId};
use super::error::CompileError;
use super::registry::{FlagKind, FlagRegistry, ENTRY_SEGMENT};
use super::scanner::{Scan, TokenStream};
use super::ulimit::Ulimit;

/// Compose format version emitted when the caller does not pick one.
pub const DEFAULT_COMPOSE_VERSION: &str = "3.3";

/// Service name used until the image reference is known.
pub const DEFAULT_SERVICE_NAME: &str = "app";

/// Compiles one `docker run` invocation into a compose YAML document.
///
/// A compiler is single-use: it owns the token stream, the document under
/// construction, and the per-compile reference cache, and is consumed by
/// [`Compiler::compile`]. The registry is shared immutably, so concurrent
/// compiles only need one instance each.
#[derive(Debug)]
pub struct Compiler<'r> {
    registry: &'r FlagRegistry,
    tokens: TokenStream,
    document: Document,
    /// Path segment -> already-created node, so repeated flags targeting
    /// the same destination append into one shared collection.
    refs: HashMap<String, NodeId>,
    service: NodeId,
    service_title: NodeId,
    version: NodeId,
    strict: bool,
}

impl<'r> Compiler<'r> {
    /// Build a compiler for `command`, stripping an optional leading
    /// `docker run` prefix. Fails with [`CompileError::EmptyInvocation`]
    /// when nothing remains after the prefix.
    pub fn new(registry: &'r FlagRegistry, command: &str) -> Result<Self, CompileError> {
        let command = command.trim();
        let command = command.strip_prefix("docker run").unwrap_or(command);

        let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(CompileError::EmptyInvocation);
        }

        let mut document = Document::new();
        let root = document.root();

        let version_key = document.scalar("version");
        let version = document.scalar(DEFAULT_COMPOSE_VERSION);
        document.push_pair(root, version_key, version);

        let services_key = document.scalar("services");
        let services = document.mapping();
        document.push_pair(root, services_key, services);

        let service_title = document.scalar(DEFAULT_SERVICE_NAME);
        let service = document.mapping();
        document.push_pair(services, service_title, service);

        Ok(Self {
            registry,
            tokens: TokenStream::new(tokens),
            document,
            refs: HashMap::new(),
            service,
            service_title,
            version,
            strict: false,
        })
    }

    /// Override the compose format version written to the document.
    pub fn set_version(&mut self, version: &str) {
        self.document.set_scalar(self.version, version);
    }

    /// In strict mode unrecognized flags abort the compile instead of
    /// being dropped with a warning.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Run the compile: scan flags, resolve each against the registry and
    /// build its destination path, then take the remaining tokens as image
    /// and command, and render the finished tree.
    pub fn compile(mut self) -> Result<String, CompileError> {
        loop {
            match self.tokens.next_flag(self.registry)? {
                Scan::Done => break,
                Scan::Skip => continue,
                Scan::Flag { name, value } => self.apply_flag(&name, &value)?,
            }
        }

        self.attach_image()?;
        Ok(self.document.render()?)
    }

    /// Route one scanned flag into the document.
    fn apply_flag(&mut self, flag: &str, value: &str) -> Result<(), CompileError> {
        let Some(spec) = self.registry.lookup(flag) else {
            if self.strict {
                return Err(CompileError::UnknownFlag(flag.to_string()));
            }
            warn!("ignoring unknown docker run flag --{flag}");
            return Ok(());
        };

        if spec.path.is_empty() {
            // Runtime-only flag with no compose counterpart.
            debug!("flag --{flag} has no compose mapping, dropping");
            return Ok(());
        }

        debug!("flag --{flag} -> {} ({:?})", spec.path, spec.kind);

        // Walk the destination path left to right starting at the service
        // node, reusing cached segments and creating the rest.
        let mut parent = self.service;
        for segment in spec.path.split('.') {
            let kind = self.registry.segment_kind(segment, spec.kind);
            parent = match self.refs.get(segment).copied() {
                Some(node) => node,
                None => self.add_node(parent, segment, value, kind)?,
            };
        }

        Ok(())
    }

    /// Materialize one path segment under `parent` and return its node.
    /// Named segments are cached for reuse; entry segments always append.
    fn add_node(
        &mut self,
        parent: NodeId,
        segment: &str,
        raw_value: &str,
        kind: FlagKind,
    ) -> Result<NodeId, CompileError> {
        let value = trim_quotes(raw_value);

        if segment == ENTRY_SEGMENT {
            let node = match kind {
                FlagKind::Map => {
                    let (entry_key, entry_value) = match value.split_once('=') {
                        Some((k, v)) => (k, trim_quotes(v)),
                        None => (value, ""),
                    };
                    let key = self.document.scalar(entry_key);
                    let val = self.document.scalar(entry_value);
                    self.document.push_pair(parent, key, val);
                    val
                }
                FlagKind::Ulimit => {
                    let ulimit = Ulimit::parse(value)?;
                    ulimit.attach(&mut self.document, parent)
                }
                // Scalar/Bool flags never target entry segments; treat
                // them like list entries if a registry edit ever does.
                FlagKind::List | FlagKind::Scalar | FlagKind::Bool => {
                    let item = self.document.scalar(value);
                    self.document.push_item(parent, item);
                    item
                }
            };
            return Ok(node);
        }

        let node = match kind {
            FlagKind::Map | FlagKind::Ulimit => self.document.mapping(),
            FlagKind::List => self.document.sequence(),
            FlagKind::Scalar | FlagKind::Bool => self.document.scalar(value),
        };
        let key = self.document.scalar(segment);
        self.document.push_pair(parent, key, node);
        self.refs.insert(segment.to_string(), node);

        Ok(node)
    }

    /// Consume the remaining tokens as image reference plus trailing
    /// command. The image renames the service in place and both pairs go
    /// in front of the flag-derived keys.
    fn attach_image(&mut self) -> Result<(), CompileError> {
        let Some(image) = self.tokens.pop() else {
            return Err(CompileError::MissingImage);
        };

        // The image reference is used verbatim as the service name; no
        // registry, namespace, or tag stripping.
        self.document.set_scalar(self.service_title, &image);

        let image_key = self.document.scalar("image");
        let image_value = self.document.scalar(&image);
        self.document.insert_pair(self.service, 0, image_key, image_value);

        let rest = self.tokens.drain();
        if !rest.is_empty() {
            let command = self.document.sequence();
            for arg in rest {
                let item = self.document.scalar(arg);
                self.document.push_item(command, item);
            }
            let command_key = self.document.scalar("command");
            self.document.insert_pair(self.service, 1, command_key, command);
        }

        Ok(())
    }
}

/// Strip a single layer of surrounding matching single or double quotes.
fn trim_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}
