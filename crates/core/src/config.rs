use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use toml_edit::{Array, DocumentMut, Item, Table, value};
use tracing::info;

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, table: &mut Table);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, table: &mut Table) {
                    table.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, table: &mut Table) {
        table
            .entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

impl<V: ConfigSerializeDefault> ConfigSerializeDefault for BTreeMap<String, V> {
    fn fix_config(self, name: &str, table: &mut Table) {
        if table.contains_key(name) {
            return;
        }
        let mut inner = Table::new();
        for (key, default) in self {
            default.fix_config(&key, &mut inner);
        }
        table.insert(name, Item::Table(inner));
    }
}

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct ServerConfig {
            $(
                pub $name: $type,
            )*
        }

        impl Default for ServerConfig {
            fn default() -> Self {
                ServerConfig {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl ServerConfig {
            /// Adds every missing key with its default value.
            fn patch(doc: &mut DocumentMut) {
                $(
                    <$type as ConfigSerializeDefault>::fix_config(
                        $default,
                        stringify!($name),
                        doc.as_table_mut(),
                    );
                )*
            }
        }
    };
}

gen_config! {
    explicit_player_marker: String = "p:".to_string(),
    nicknames_enabled: bool = true,
    nickname_prefix: String = "~".to_string(),
    strict_nicknames: bool = false,
    console_bypass_permissions: bool = true,
    see_hidden_permission: String = "lodestone.vanish.see".to_string(),
    kits: Vec<String> = vec!["starter".to_string(), "tools".to_string()],
    jails: Vec<String> = vec!["cell1".to_string()],
    command_aliases: BTreeMap<String, String> = BTreeMap::new(),
    permissions: BTreeMap<String, Vec<String>> = BTreeMap::from([(
        "default".to_string(),
        vec![
            "lodestone.help".to_string(),
            "lodestone.kit".to_string(),
            "lodestone.seen".to_string(),
        ],
    )])
}

impl ServerConfig {
    /// Parses `text`, filling in missing keys. Returns the configuration and
    /// the patched document text.
    pub fn from_toml(text: &str) -> Result<(ServerConfig, String)> {
        let mut doc = text
            .parse::<DocumentMut>()
            .context("Configuration is not valid TOML")?;
        Self::patch(&mut doc);
        let patched = doc.to_string();
        let config = toml::from_str(&patched).context("Configuration has invalid values")?;
        Ok((config, patched))
    }

    /// Loads `path`, writing missing keys back to it. A missing file is
    /// created with every default.
    pub fn load(path: &Path) -> Result<ServerConfig> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let (config, patched) = Self::from_toml(&text)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        if text != patched {
            fs::write(path, patched)
                .with_context(|| format!("Failed to write defaults to {}", path.display()))?;
        }
        Ok(config)
    }
}

/// Shared access to the live configuration.
///
/// Readers take a snapshot with [`SettingsHandle::current`] on every call
/// instead of holding on to one, so a reload is seen by the next parse.
#[derive(Clone)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<ServerConfig>>>,
    path: Option<Arc<PathBuf>>,
}

impl SettingsHandle {
    /// A handle with no backing file.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
            path: None,
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = ServerConfig::load(&path)?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
            path: Some(Arc::new(path)),
        })
    }

    pub fn current(&self) -> Arc<ServerConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, config: ServerConfig) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    /// Re-reads the backing file. On failure the previous configuration
    /// stays in effect.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            bail!("Configuration was not loaded from a file");
        };
        let config = ServerConfig::load(path)?;
        self.replace(config);
        info!("Reloaded configuration from {}", path.display());
        Ok(())
    }
}
