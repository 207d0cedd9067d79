//! Configuração do simulador carregada a partir de `lipsync.toml`.
//!
//! A struct [`SimulatorConfig`] contém todos os atrasos, taxas e textos fixos
//! usados pelo simulador. Valores não presentes no arquivo usam defaults
//! equivalentes ao backend original. As variáveis de ambiente
//! `LIPSYNC_TIME_SCALE` e `LIPSYNC_POLL_INTERVAL_MS` têm precedência sobre o arquivo.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{LipSyncError, Result};
use crate::scheduler::MAX_TIME_SCALE;

/// Nome do arquivo procurado no diretório atual quando nenhum caminho é dado.
pub const CONFIG_FILE: &str = "lipsync.toml";

/// Configuração de nível superior carregada de `lipsync.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Multiplicador aplicado a todo atraso simulado (0 torna tudo instantâneo).
    pub time_scale: f64,

    /// Intervalo entre consultas de status feitas pelo observador.
    pub poll_interval_ms: u64,

    pub latency: LatencyConfig,
    pub job_script: JobScriptConfig,
    pub clone: CloneConfig,
}

/// Latências simuladas de cada operação exposta.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub submit_ms: u64,
    pub status_ms: u64,
    pub voices_ms: u64,
    pub avatars_ms: u64,
    pub clone_ms: u64,
}

/// Roteiro temporizado de um job de lip-sync.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobScriptConfig {
    /// ACCEPTED → PROCESSING (25%).
    pub to_processing_ms: u64,
    /// PROCESSING 25% → PROCESSING 60%.
    pub to_midway_ms: u64,
    /// PROCESSING 60% → FAILED, apenas quando o vídeo contém `failure_marker`.
    pub to_failed_ms: u64,
    /// PROCESSING 60% → COMPLETED.
    pub to_completed_ms: u64,
    pub failure_marker: String,
    pub error_message: String,
    pub output_url: String,
}

/// Parâmetros do resultado assíncrono de uma clonagem de voz.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloneConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probabilidade de sucesso da clonagem, entre 0 e 1.
    pub success_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            poll_interval_ms: 3000,
            latency: LatencyConfig::default(),
            job_script: JobScriptConfig::default(),
            clone: CloneConfig::default(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            submit_ms: 500,
            status_ms: 300,
            voices_ms: 400,
            avatars_ms: 300,
            clone_ms: 1000,
        }
    }
}

impl Default for JobScriptConfig {
    fn default() -> Self {
        Self {
            to_processing_ms: 1500,
            to_midway_ms: 3000,
            to_failed_ms: 1500,
            to_completed_ms: 2500,
            failure_marker: "fail_case".to_string(),
            error_message: "Simulated processing failure: Invalid video content.".to_string(),
            output_url: "https://www.w3schools.com/html/mov_bbb.mp4".to_string(),
        }
    }
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 10_000,
            max_delay_ms: 15_000,
            success_rate: 0.8,
        }
    }
}

impl SimulatorConfig {
    /// Carrega a configuração de `lipsync.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito e aplica as variáveis de ambiente.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SimulatorConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Aplica sobrescritas vindas de `lookup` (normalmente o ambiente do processo).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup("LIPSYNC_TIME_SCALE").filter(|v| !v.is_empty()) {
            self.time_scale = raw
                .parse()
                .map_err(|_| LipSyncError::Config(format!("LIPSYNC_TIME_SCALE={raw} is not a number")))?;
        }
        if let Some(raw) = lookup("LIPSYNC_POLL_INTERVAL_MS").filter(|v| !v.is_empty()) {
            self.poll_interval_ms = raw.parse().map_err(|_| {
                LipSyncError::Config(format!("LIPSYNC_POLL_INTERVAL_MS={raw} is not an integer"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || !(0.0..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(LipSyncError::Config(format!(
                "time_scale must be between 0 and {MAX_TIME_SCALE}, got {}",
                self.time_scale
            )));
        }
        if !(0.0..=1.0).contains(&self.clone.success_rate) {
            return Err(LipSyncError::Config(format!(
                "clone.success_rate must be within [0, 1], got {}",
                self.clone.success_rate
            )));
        }
        if self.clone.min_delay_ms > self.clone.max_delay_ms {
            return Err(LipSyncError::Config(format!(
                "clone.min_delay_ms ({}) exceeds clone.max_delay_ms ({})",
                self.clone.min_delay_ms, self.clone.max_delay_ms
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = SimulatorConfig::default();
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.poll_interval_ms, 3000);
        assert_eq!(config.latency.submit_ms, 500);
        assert_eq!(config.job_script.to_completed_ms, 2500);
        assert_eq!(config.job_script.failure_marker, "fail_case");
        assert_eq!(config.clone.success_rate, 0.8);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            time_scale = 0.1

            [job_script]
            failure_marker = "broken"
        "#;
        let config: SimulatorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.time_scale, 0.1);
        assert_eq!(config.job_script.failure_marker, "broken");
        assert_eq!(config.job_script.to_midway_ms, 3000);
        assert_eq!(config.latency.status_ms, 300);
        assert_eq!(config.clone.max_delay_ms, 15_000);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = 250\n[clone]\nsuccess_rate = 1.0").unwrap();

        let config = SimulatorConfig::load_from(file.path()).unwrap();
        assert_eq!(config.clone.success_rate, 1.0);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulatorConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.latency.voices_ms, 400);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time_scale = \"fast\"").unwrap();

        let err = SimulatorConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, LipSyncError::Toml(_)));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = SimulatorConfig::default();
        config
            .apply_overrides(|key| match key {
                "LIPSYNC_TIME_SCALE" => Some("0.5".into()),
                "LIPSYNC_POLL_INTERVAL_MS" => Some("100".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn bad_override_is_config_error() {
        let mut config = SimulatorConfig::default();
        let err = config
            .apply_overrides(|key| (key == "LIPSYNC_TIME_SCALE").then(|| "quick".into()))
            .unwrap_err();
        assert!(matches!(err, LipSyncError::Config(_)));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = SimulatorConfig::default();
        config.clone.success_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.clone.min_delay_ms = 20_000;
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.time_scale = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulatorConfig::default();
        config.time_scale = 1e20;
        assert!(matches!(config.validate(), Err(LipSyncError::Config(_))));

        let mut config = SimulatorConfig::default();
        config.clone.success_rate = f64::NAN;
        assert!(config.validate().is_err());
    }
}
