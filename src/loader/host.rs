//! Host capabilities offered to loaded modules
//!
//! Loaded modules may import from the `gistup` namespace:
//!
//! | Import | Signature | Effect |
//! |--------|-----------|--------|
//! | `gistup.log` | `(ptr: i32, len: i32)` | log a UTF-8 string from the module's exported `memory` |
//!
//! Nothing else is provided; any other unresolved import fails instantiation.

use tracing::info;
use wasmtime::{Caller, Extern, Linker};

/// Import namespace of the host functions
pub const HOST_MODULE: &str = "gistup";

/// Per-registry state reachable from host functions
#[derive(Debug, Default)]
pub struct HostState {
    pub(crate) output: Vec<String>,
}

/// Register the host functions in `linker`
pub(crate) fn define(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    linker.func_wrap(
        HOST_MODULE,
        "log",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32| -> wasmtime::Result<()> {
            let memory = caller
                .get_export("memory")
                .and_then(Extern::into_memory)
                .ok_or_else(|| wasmtime::Error::msg("gistup.log needs an exported `memory`"))?;

            let start = ptr as u32 as usize;
            let end = start + len as u32 as usize;
            let bytes = memory
                .data(&caller)
                .get(start..end)
                .ok_or_else(|| wasmtime::Error::msg("gistup.log range out of bounds"))?;
            let line = std::str::from_utf8(bytes)?.to_string();

            info!(target: "gistup::module", "{}", line);
            caller.data_mut().output.push(line);
            Ok(())
        },
    )?;
    Ok(())
}
