//! Document capability trait.

use serde_json::value::RawValue;
use serde_json::Value;

/// Anything that can be stored in the engine as a JSON document.
///
/// The trait is object-safe so a single bulk batch can mix document shapes.
///
/// # Example
///
/// ```rust
/// use clubsearch_engine::Document;
/// use serde::Serialize;
/// use serde_json::value::RawValue;
///
/// #[derive(Serialize)]
/// struct Product {
///     sku: String,
///     name: String,
/// }
///
/// impl Document for Product {
///     fn document_id(&self) -> Option<String> {
///         Some(self.sku.clone())
///     }
///
///     fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
///         serde_json::value::to_raw_value(self)
///     }
/// }
/// ```
pub trait Document {
    /// Id to store the document under. `None` lets the engine assign one.
    fn document_id(&self) -> Option<String> {
        None
    }

    /// Encode the document body.
    ///
    /// Returns raw JSON text so embedded raw fragments reach the engine
    /// exactly as written.
    fn to_source(&self) -> serde_json::Result<Box<RawValue>>;
}

/// Untyped documents get an engine-assigned id.
impl Document for Value {
    fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

impl<D: Document + ?Sized> Document for &D {
    fn document_id(&self) -> Option<String> {
        (**self).document_id()
    }

    fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
        (**self).to_source()
    }
}
