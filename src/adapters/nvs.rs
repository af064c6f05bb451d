//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] by storing [`DoorConfig`] as a postcard blob
//! under namespace `garage`, key `doorcfg`.
//!
//! - A missing blob loads as [`DoorConfig::default()`].
//! - A blob that fails to decode is [`ConfigError::Corrupted`].
//! - A decoded blob is range-checked before use, and `save` validates
//!   before anything touches flash.
//! - ESP-IDF NVS commits are atomic per `nvs_commit()`.  The simulation
//!   backend keeps the blob in memory.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::DoorConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &[u8] = b"garage\0";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &[u8] = b"doorcfg\0";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    blob: Option<Vec<u8>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the partition is erased
    /// and re-initialised.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32
            {
                warn!("NVS: erasing and re-initialising flash partition");
                esp!(unsafe { nvs_flash_erase() }).map_err(|_| ConfigError::IoError)?;
                esp!(unsafe { nvs_flash_init() }).map_err(|_| ConfigError::IoError)?;
            } else {
                esp!(ret).map_err(|_| ConfigError::IoError)?;
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
            Ok(Self {})
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsAdapter: simulation backend");
            Ok(Self { blob: None })
        }
    }

    fn decode(bytes: &[u8]) -> Result<DoorConfig, ConfigError> {
        let cfg: DoorConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, EspError>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, EspError>,
    {
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let mut handle: nvs_handle_t = 0;
        // SAFETY: namespace is NUL-terminated and `handle` is a valid slot.
        esp!(unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr().cast(), mode, &mut handle) })?;

        let result = f(handle);
        // SAFETY: handle was opened above.
        unsafe { nvs_close(handle) };
        result
    }

    /// Raw blob stored under the config key, or `None` if absent.
    #[cfg(target_os = "espidf")]
    fn read_blob() -> Result<Option<Vec<u8>>, EspError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            // SAFETY: null buffer queries the stored size.
            esp!(unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr().cast(), core::ptr::null_mut(), &mut size)
            })?;
            let mut buf = vec![0u8; size.min(MAX_BLOB_SIZE)];
            size = buf.len();
            // SAFETY: `buf` holds `size` bytes.
            esp!(unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
            })?;
            buf.truncate(size);
            Ok(buf)
        });
        match result {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.code() == ESP_ERR_NVS_NOT_FOUND as i32 => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remove any stored config so the next boot uses defaults.
    pub fn erase_config(&mut self) -> Result<(), ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(true, |handle| {
                // SAFETY: key is NUL-terminated.
                let ret = unsafe { nvs_erase_key(handle, CONFIG_KEY.as_ptr().cast()) };
                if ret != ESP_ERR_NVS_NOT_FOUND as i32 {
                    esp!(ret)?;
                }
                // SAFETY: handle is open for writing.
                esp!(unsafe { nvs_commit(handle) })
            });
            result.map_err(|e| {
                warn!("NvsAdapter: erase failed: {}", e);
                ConfigError::IoError
            })?;
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.blob = None;
        }

        info!("NvsAdapter: stored config erased");
        Ok(())
    }

    #[cfg(all(test, not(target_os = "espidf")))]
    fn put_raw(&mut self, bytes: &[u8]) {
        self.blob = Some(bytes.to_vec());
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<DoorConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        let stored = self.blob.clone();

        #[cfg(target_os = "espidf")]
        let stored = Self::read_blob().map_err(|e| {
            warn!("NvsAdapter: NVS read error {}", e);
            ConfigError::IoError
        })?;

        match stored {
            Some(bytes) => {
                let cfg = Self::decode(&bytes)?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            None => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(DoorConfig::default())
            }
        }
    }

    fn save(&mut self, config: &DoorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.blob = Some(bytes.clone());
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(true, |handle| {
                // SAFETY: key is NUL-terminated and `bytes` outlives the call.
                esp!(unsafe {
                    nvs_set_blob(handle, CONFIG_KEY.as_ptr().cast(), bytes.as_ptr().cast(), bytes.len())
                })?;
                // SAFETY: handle is open for writing.
                esp!(unsafe { nvs_commit(handle) })
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {}", e);
                ConfigError::IoError
            })?;
        }

        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
