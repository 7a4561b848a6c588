//! Registry of loaded modules

use crate::error::{GistupError, GistupResult};
use crate::loader::host::{self, HostState, HOST_MODULE};
use crate::loader::module_name_from_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wasmtime::{Engine, Instance, Linker, Module, Store, WasmParams, WasmResults};

/// Handle to one instantiated module
#[derive(Debug, Clone)]
pub struct LoadedModule {
    name: String,
    path: PathBuf,
    serial: u64,
    instance: Instance,
}

impl LoadedModule {
    /// Name the module was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load number, unique within the owning registry
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }
}

/// Owns the wasm engine and every module loaded through it
///
/// Registering a module makes its exports importable by modules loaded
/// later, under the registered name. A later load with the same name
/// replaces the earlier registration; handles to the earlier instance stay
/// usable. Instances live until the registry is dropped.
pub struct ModuleRegistry {
    engine: Engine,
    store: Store<HostState>,
    linker: Linker<HostState>,
    modules: HashMap<String, LoadedModule>,
    next_serial: u64,
}

impl ModuleRegistry {
    /// Create an empty registry with the host functions linked in
    pub fn new() -> GistupResult<Self> {
        let engine = Engine::default();
        let store = Store::new(&engine, HostState::default());
        let mut linker = Linker::new(&engine);
        linker.allow_shadowing(true);
        host::define(&mut linker).map_err(|error| GistupError::Execution {
            name: HOST_MODULE.to_string(),
            error,
        })?;

        Ok(Self {
            engine,
            store,
            linker,
            modules: HashMap::new(),
            next_serial: 0,
        })
    }

    /// Compile, instantiate and register the module at `path`
    ///
    /// `name` defaults to the file stem and may not be the host namespace
    /// [`HOST_MODULE`]. Instantiation runs the module's
    /// start function; its trap is returned unchanged in
    /// [`GistupError::Execution`].
    pub fn load_from_file(&mut self, path: &Path, name: Option<&str>) -> GistupResult<LoadedModule> {
        if !path.exists() {
            return Err(GistupError::PathNotFound(path.to_path_buf()));
        }

        let name = match name {
            Some(name) => name.to_string(),
            None => module_name_from_path(path)
                .ok_or_else(|| GistupError::ModuleName(path.display().to_string()))?,
        };
        if name == HOST_MODULE {
            return Err(GistupError::ReservedName(name));
        }

        let module = Module::from_file(&self.engine, path).map_err(|error| GistupError::Compile {
            path: path.to_path_buf(),
            error,
        })?;

        let instance = self
            .linker
            .instantiate(&mut self.store, &module)
            .map_err(|error| GistupError::Execution {
                name: name.clone(),
                error,
            })?;

        self.linker
            .instance(&mut self.store, &name, instance)
            .map_err(|error| GistupError::Execution {
                name: name.clone(),
                error,
            })?;

        self.next_serial += 1;
        let loaded = LoadedModule {
            name: name.clone(),
            path: path.to_path_buf(),
            serial: self.next_serial,
            instance,
        };

        if let Some(previous) = self.modules.insert(name.clone(), loaded.clone()) {
            debug!("Module {} replaces load #{}", name, previous.serial);
        }
        info!("Loaded module {} from {}", name, path.display());

        Ok(loaded)
    }

    /// Module currently registered under `name`
    pub fn get(&self, name: &str) -> Option<&LoadedModule> {
        self.modules.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Export names of the module registered under `name`
    pub fn exports(&mut self, name: &str) -> GistupResult<Vec<String>> {
        let instance = self.lookup(name)?.instance;
        Ok(instance
            .exports(&mut self.store)
            .map(|export| export.name().to_string())
            .collect())
    }

    /// Call a typed export of the module registered under `name`
    pub fn call<P, R>(&mut self, name: &str, export: &str, params: P) -> GistupResult<R>
    where
        P: WasmParams,
        R: WasmResults,
    {
        let module = self.lookup(name)?.clone();
        self.call_module(&module, export, params)
    }

    /// Call a typed export of a specific loaded instance
    pub fn call_module<P, R>(
        &mut self,
        module: &LoadedModule,
        export: &str,
        params: P,
    ) -> GistupResult<R>
    where
        P: WasmParams,
        R: WasmResults,
    {
        let call_err = |error| GistupError::ExportCall {
            module: module.name.clone(),
            export: export.to_string(),
            error,
        };

        let func = module
            .instance
            .get_typed_func::<P, R>(&mut self.store, export)
            .map_err(call_err)?;
        func.call(&mut self.store, params).map_err(call_err)
    }

    /// Lines logged by modules through `gistup.log`
    pub fn output(&self) -> &[String] {
        &self.store.data().output
    }

    /// Drain the logged lines
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.store.data_mut().output)
    }

    fn lookup(&self, name: &str) -> GistupResult<&LoadedModule> {
        self.modules
            .get(name)
            .ok_or_else(|| GistupError::ModuleNotFound(name.to_string()))
    }
}
