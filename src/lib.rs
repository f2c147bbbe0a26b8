//! # kvform
//!
//! A schema-driven editor for trees of key/value data.
//!
//! kvform projects a value tree and an optional schema into a tree of typed
//! form fields, validates edits against the schema's declared constraints,
//! and notifies the host synchronously after every successful mutation. The
//! host owns presentation; kvform owns the data, the rules, and the field
//! structure.
//!
//! ## Core Systems
//!
//! - **[`path`]** — Path type and the `a.b[0].c` string syntax
//! - **[`value`]** — The value tree: tagged variants with ordered objects
//! - **[`schema`]** — Schema nodes, kind resolution, defaults
//! - **[`validate`]** — Pure validation rules and the ordered error set
//! - **[`render`]** — Projection of (value, schema, errors, UI state) into a field tree
//! - **[`event`]** — Change/context-menu/invocation events and the drain-based queue
//! - **[`editor`]** — The [`KeyValueEditor`](editor::KeyValueEditor) facade and edit throttling
//! - **[`theme`]** — Light/dark/auto theme modes

// Foundation
pub mod path;
pub mod value;

// Schema and rules
pub mod schema;
pub mod validate;

// Projection
pub mod render;

// Events and the editor facade
pub mod editor;
pub mod event;

// Display
pub mod theme;
