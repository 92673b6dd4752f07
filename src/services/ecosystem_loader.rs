use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::models::ecosystem::AppDescriptor;
use crate::models::{Ecosystem, Preset};

const BINARY: &str = "./target/release/stream-manager";

impl Ecosystem {
    /// 内置部署，与 deploy/ 下的 JSON 文件保持一致
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Local => Ecosystem {
                apps: vec![
                    AppDescriptor {
                        name: "stream-bot".to_string(),
                        script: format!("{} stream", BINARY),
                        watch: true,
                        ignore_watch: vec![
                            "target".to_string(),
                            "videos".to_string(),
                            "thumbs".to_string(),
                        ],
                        autorestart: true,
                        env: BTreeMap::new(),
                    },
                    AppDescriptor {
                        name: "web-server".to_string(),
                        script: format!("{} serve", BINARY),
                        watch: true,
                        ignore_watch: vec!["target".to_string()],
                        autorestart: true,
                        env: BTreeMap::new(),
                    },
                ],
            },
            Preset::Render => Ecosystem {
                apps: vec![AppDescriptor {
                    name: "web-server".to_string(),
                    script: format!("{} serve --variant static", BINARY),
                    watch: false,
                    ignore_watch: vec!["target".to_string()],
                    autorestart: true,
                    env: BTreeMap::from([("PORT".to_string(), "10000".to_string())]),
                }],
            },
        }
    }

    /// 从文件加载描述（根据扩展名选择 .json 或 .toml），加载后立即校验
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ecosystem file {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let ecosystem = match extension {
            "json" => Self::parse_json(&contents)?,
            "toml" => Self::parse_toml(&contents)?,
            _ => bail!(
                "Unsupported ecosystem format '{}' ({}). Use .json or .toml",
                extension,
                path.display()
            ),
        };

        ecosystem.validate()?;
        Ok(ecosystem)
    }

    pub fn parse_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse ecosystem JSON")
    }

    pub fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse ecosystem TOML")
    }

    /// 只做语法层面的检查，重启和监听策略交给 pm2
    pub fn validate(&self) -> Result<()> {
        if self.apps.is_empty() {
            bail!("Ecosystem declares no apps");
        }

        let mut seen = HashSet::new();
        for (index, app) in self.apps.iter().enumerate() {
            if app.name.trim().is_empty() {
                bail!("App #{} is missing a name", index);
            }
            if app.script.trim().is_empty() {
                bail!("App '{}' is missing a script", app.name);
            }
            if !seen.insert(app.name.as_str()) {
                bail!("Duplicate app name '{}'", app.name);
            }
        }

        Ok(())
    }

    /// 输出 pm2 可直接读取的 JSON
    pub fn to_pm2_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to render ecosystem JSON")
    }
}
