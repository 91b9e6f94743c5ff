//! Block handler registry.
//!
//! Maps block type names to handlers. The registry is filled once at startup
//! and consulted by the loader for every block on the page.

use std::collections::HashMap;
use std::fmt;

use dom_query::Selection;

use crate::session::PageSession;
use crate::Result;

/// Decorates one block of a given type.
pub trait BlockDecorator {
    /// Transform `block` in place.
    fn decorate(&self, block: &Selection<'_>, session: &mut PageSession<'_>) -> Result<()>;
}

impl<F> BlockDecorator for F
where
    F: Fn(&Selection<'_>, &mut PageSession<'_>) -> Result<()>,
{
    fn decorate(&self, block: &Selection<'_>, session: &mut PageSession<'_>) -> Result<()> {
        self(block, session)
    }
}

/// A block class name split into its type and option flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockName {
    /// Type name used for dispatch.
    pub base: String,
    /// Option flags carried in the class name, in authored order.
    pub options: Vec<String>,
}

/// Block type names mapped to their handlers.
pub struct BlockRegistry {
    handlers: HashMap<String, Box<dyn BlockDecorator>>,
    option_bearing: Vec<String>,
}

impl BlockRegistry {
    /// A registry with no handlers and no option-bearing types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            option_bearing: Vec::new(),
        }
    }

    /// The site's built-in block types.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("columns", super::columns::decorate);
        registry.register_option_bearing("checker-board");
        registry
    }

    /// Register `handler` for blocks named `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, handler: impl BlockDecorator + 'static) {
        self.handlers.insert(name.to_string(), Box::new(handler));
    }

    /// Mark `name` as a type whose class names may carry `-`-separated options.
    pub fn register_option_bearing(&mut self, name: &str) {
        if !self.option_bearing.iter().any(|n| n == name) {
            self.option_bearing.push(name.to_string());
        }
    }

    /// Handler for a block type.
    #[must_use]
    pub fn handler(&self, name: &str) -> Option<&dyn BlockDecorator> {
        self.handlers.get(name).map(AsRef::as_ref)
    }

    /// Split a raw block class name into type and options.
    ///
    /// `checker-board-dark-wide` becomes `checker-board` with options
    /// `dark`, `wide` when `checker-board` is option-bearing; any other name
    /// is its own type.
    #[must_use]
    pub fn parse_name(&self, raw: &str) -> BlockName {
        for base in &self.option_bearing {
            if let Some(rest) = raw.strip_prefix(base.as_str()).and_then(|r| r.strip_prefix('-')) {
                return BlockName {
                    base: base.clone(),
                    options: rest.split('-').map(str::to_string).collect(),
                };
            }
        }
        BlockName {
            base: raw.to_string(),
            options: Vec::new(),
        }
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("BlockRegistry")
            .field("handlers", &names)
            .field("option_bearing", &self.option_bearing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_bearing_names_are_split() {
        let mut registry = BlockRegistry::new();
        registry.register_option_bearing("foo");

        let name = registry.parse_name("foo-bar-baz");
        assert_eq!(name.base, "foo");
        assert_eq!(name.options, vec!["bar", "baz"]);
    }

    #[test]
    fn other_names_are_left_whole() {
        let mut registry = BlockRegistry::new();
        registry.register_option_bearing("foo");

        assert_eq!(registry.parse_name("foobar").base, "foobar");
        assert_eq!(registry.parse_name("foo").options, Vec::<String>::new());
        assert_eq!(registry.parse_name("how-to-steps").base, "how-to-steps");
    }

    #[test]
    fn defaults_register_columns() {
        let registry = BlockRegistry::with_defaults();

        assert!(registry.handler("columns").is_some());
        assert!(registry.handler("checker-board").is_none());
        assert_eq!(registry.parse_name("checker-board-dark").options, vec!["dark"]);
    }

    #[test]
    fn closures_can_be_registered() {
        let mut registry = BlockRegistry::new();
        registry.register("noop", |_block: &Selection<'_>, _session: &mut PageSession<'_>| -> Result<()> {
            Ok(())
        });

        assert!(registry.handler("noop").is_some());
        assert!(format!("{registry:?}").contains("noop"));
    }
}
