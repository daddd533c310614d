//! Extension type transformers.
//!
//! A [`TypeTransformer`] maps one application type to and from a MessagePack
//! extension. A [`TransformerCollection`] holds transformers in registration
//! order; lookups in both directions return the first match.

use std::fmt;
use std::sync::Arc;

use crate::error::TransformError;
use crate::value::{Extension, Value};

/// Pack/unpack capability for one extension type code.
pub trait TypeTransformer: Send + Sync {
    /// Extension type code this transformer emits and decodes.
    fn tag(&self) -> i8;

    /// Returns the extension payload if `value` is handled by this
    /// transformer, `None` otherwise.
    fn pack(&self, value: &Value) -> Option<Vec<u8>>;

    /// Decodes an extension payload carrying [`TypeTransformer::tag`].
    fn unpack(&self, payload: &[u8]) -> Result<Value, TransformError>;
}

/// Ordered set of transformers.
#[derive(Clone, Default)]
pub struct TransformerCollection {
    transformers: Vec<Arc<dyn TypeTransformer>>,
}

impl TransformerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TransformerCollection::add`].
    pub fn with<T: TypeTransformer + 'static>(mut self, transformer: T) -> Self {
        self.add(transformer);
        self
    }

    /// Registers `transformer` after every existing one.
    pub fn add<T: TypeTransformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.transformers.push(Arc::new(transformer));
        self
    }

    /// Removes every transformer registered for `tag`. Returns how many were
    /// removed.
    pub fn remove(&mut self, tag: i8) -> usize {
        let before = self.transformers.len();
        self.transformers.retain(|t| t.tag() != tag);
        before - self.transformers.len()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn TypeTransformer + 'static)> + '_ {
        self.transformers.iter().map(|t| t.as_ref())
    }

    /// First transformer that claims `value`, rendered as an extension.
    pub fn pack_lookup(&self, value: &Value) -> Option<Extension> {
        self.transformers.iter().find_map(|t| {
            t.pack(value).map(|payload| Extension {
                tag: t.tag(),
                payload,
            })
        })
    }

    /// First transformer registered for `tag`.
    pub fn unpack_lookup(&self, tag: i8) -> Option<&dyn TypeTransformer> {
        self.iter().find(|t| t.tag() == tag)
    }
}

impl fmt::Debug for TransformerCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.transformers.iter().map(|t| t.tag()))
            .finish()
    }
}
