//! A typed config bound to one file on disk.
//!
//! [`ConfigFile`] holds the current instance and the file it is persisted to.
//! `load` replaces the instance with what is on disk; `save` writes the
//! instance out. The `try_*` variants log failures instead of returning them.
//! With the `async` feature, `load_async`/`save_async` run the same calls on a
//! rate-limited [`TaskGate`](crate::gate::TaskGate) owned by the handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::persist;
use crate::schema::Section;
use crate::types::GateSettings;

#[cfg(feature = "async")]
use crate::gate::TaskGate;

pub struct ConfigFile<C: Section> {
    path: PathBuf,
    instance: Arc<Mutex<C>>,
    settings: GateSettings,
    #[cfg(feature = "async")]
    gate: Mutex<Option<TaskGate>>,
}

impl<C: Section> ConfigFile<C> {
    pub(crate) fn new(path: PathBuf, instance: C, settings: GateSettings) -> Self {
        Self {
            path,
            instance: Arc::new(Mutex::new(instance)),
            settings,
            #[cfg(feature = "async")]
            gate: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gate_settings(&self) -> GateSettings {
        self.settings
    }

    /// A copy of the current instance.
    pub fn instance(&self) -> C
    where
        C: Clone,
    {
        self.instance.lock().clone()
    }

    pub fn set_instance(&self, instance: C) {
        *self.instance.lock() = instance;
    }

    /// Modify the current instance in place.
    pub fn update<F: FnOnce(&mut C)>(&self, f: F) {
        f(&mut self.instance.lock());
    }

    /// The text [`save`](Self::save) would write right now.
    pub fn render(&self) -> Result<String, ConfigError> {
        persist::render(&*self.instance.lock())
    }

    /// Read the file, make it the current instance and return a copy.
    pub fn load(&self) -> Result<C, ConfigError>
    where
        C: Clone,
    {
        load_into(&self.path, &self.instance)
    }

    /// [`load`](Self::load), logging the error and returning `None` on failure.
    pub fn try_load(&self) -> Option<C>
    where
        C: Clone,
    {
        self.load()
            .inspect_err(|e| warn!(path = %self.path.display(), error = %e, "config load failed"))
            .ok()
    }

    /// Write the current instance to the file.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_from(&self.path, &self.instance)
    }

    /// [`save`](Self::save), logging the error and returning whether it worked.
    pub fn try_save(&self) -> bool {
        self.save()
            .inspect_err(|e| warn!(path = %self.path.display(), error = %e, "config save failed"))
            .is_ok()
    }

    /// Load the file, or write the current instance out if there is none yet.
    pub fn load_or_default(&self) -> Result<C, ConfigError>
    where
        C: Clone,
    {
        match self.load() {
            Err(ConfigError::FileNotFound { .. }) => {
                debug!(path = %self.path.display(), "no config file, writing defaults");
                self.save()?;
                Ok(self.instance())
            }
            other => other,
        }
    }
}

fn load_into<C: Section + Clone>(path: &Path, slot: &Mutex<C>) -> Result<C, ConfigError> {
    let loaded: C = persist::load(path)?;
    *slot.lock() = loaded.clone();
    Ok(loaded)
}

fn save_from<C: Section>(path: &Path, slot: &Mutex<C>) -> Result<(), ConfigError> {
    let text = persist::render(&*slot.lock())?;
    persist::write_text(path, &text)
}

#[cfg(feature = "async")]
impl<C: Section + Clone + Send> ConfigFile<C> {
    /// The handle's gate, started on the current runtime at first use.
    fn gate(&self) -> Result<TaskGate, ConfigError> {
        let mut slot = self.gate.lock();
        if let Some(gate) = slot.as_ref() {
            return Ok(gate.clone());
        }
        let gate = TaskGate::new(self.settings)?;
        *slot = Some(gate.clone());
        Ok(gate)
    }

    /// Queue a [`load`](Self::load). `on_finish` runs on a blocking thread.
    pub fn load_async<F>(&self, on_finish: F) -> Result<(), ConfigError>
    where
        F: FnOnce(Result<C, ConfigError>) + Send + 'static,
    {
        let path = self.path.clone();
        let instance = Arc::clone(&self.instance);
        self.gate()?.queue(
            move || load_into(&path, &instance),
            move |result| on_finish(result.and_then(|r| r)),
        )
    }

    /// Queue a [`save`](Self::save). The instance is read when the save
    /// runs, not when it is queued.
    pub fn save_async<F>(&self, on_finish: F) -> Result<(), ConfigError>
    where
        F: FnOnce(Result<(), ConfigError>) + Send + 'static,
    {
        let path = self.path.clone();
        let instance = Arc::clone(&self.instance);
        self.gate()?.queue(
            move || save_from(&path, &instance),
            move |result| on_finish(result.and_then(|r| r)),
        )
    }
}
