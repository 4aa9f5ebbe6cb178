//! WASM bindings for the operation catalog.
//!
//! Front ends build their menus from [`list_operations`] instead of
//! hard-coding ids, so the menu always matches what the pipeline accepts.

use crate::types::js_error;
use restorelab_core::transform::Category;
use restorelab_core::Operation;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct OperationInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub takes_kernel: bool,
}

/// The catalog in menu order.
pub(crate) fn catalog() -> Vec<OperationInfo> {
    Operation::ALL
        .into_iter()
        .map(|op| OperationInfo {
            id: op.id(),
            label: op.label(),
            category: op.category(),
            takes_kernel: op.takes_kernel(),
        })
        .collect()
}

/// List all operations as `{ id, label, category, takes_kernel }` objects.
///
/// # Example (TypeScript)
///
/// ```typescript
/// for (const op of list_operations()) {
///   menu.add(op.category, op.label, () => run(op.id, op.takes_kernel));
/// }
/// ```
#[wasm_bindgen]
pub fn list_operations() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&catalog()).map_err(js_error)
}

/// Operation ids in menu order.
#[wasm_bindgen]
pub fn operation_ids() -> js_sys::Array {
    Operation::ALL
        .into_iter()
        .map(|op| JsValue::from_str(op.id()))
        .collect()
}
