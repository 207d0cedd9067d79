//! Interface de linha de comando do `lipsync` baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (submit, voices, avatars,
//! languages, clone, demo) e flags globais (--config, --time-scale, --verbose, --json).
//! Todo o estado vive no processo: cada execução começa com o catálogo semente.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lipsync::{JobCreationRequest, VoiceCloneRequest};

/// lipsync: simulador de backend de vídeo com lip-sync e clonagem de voz.
#[derive(Debug, Parser)]
#[command(name = "lipsync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: ./lipsync.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Multiplicador de todos os atrasos simulados (0 = instantâneo).
    #[arg(long, global = true)]
    pub time_scale: Option<f64>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Imprime os resultados como JSON em vez de texto formatado.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia um job de lip-sync e acompanha o status até o fim.
    Submit(SubmitArgs),

    /// Lista as vozes disponíveis.
    Voices,

    /// Lista os avatares disponíveis.
    Avatars,

    /// Lista os idiomas suportados.
    Languages,

    /// Solicita a clonagem de uma voz a partir de uma amostra de áudio.
    Clone(CloneArgs),

    /// Executa os cenários de demonstração de ponta a ponta.
    Demo,
}

#[derive(Debug, clap::Args)]
pub struct SubmitArgs {
    /// Vídeo de entrada (URL ou nome do arquivo).
    #[arg(long)]
    pub video: String,

    /// Áudio de entrada (URL ou nome do arquivo).
    #[arg(long, conflicts_with = "text")]
    pub audio: Option<String>,

    /// Roteiro para síntese de fala, usado no lugar do áudio.
    #[arg(long)]
    pub text: Option<String>,

    /// Idioma alvo (código ISO 639-1).
    #[arg(long, default_value = "en")]
    pub lang: String,

    #[arg(long)]
    pub voice: Option<String>,

    #[arg(long)]
    pub avatar: Option<String>,

    #[arg(long)]
    pub viseme_mapping: Option<String>,

    /// Intensidade da emoção, de 0.0 a 1.0.
    #[arg(long)]
    pub emotion: Option<f32>,

    #[arg(long)]
    pub style: Option<String>,

    #[arg(long)]
    pub callback_url: Option<String>,

    /// Retorna logo após o aceite, sem acompanhar o job.
    #[arg(long, default_value_t = false)]
    pub no_wait: bool,
}

impl SubmitArgs {
    /// Converte os argumentos no pedido enviado ao backend.
    pub fn to_request(&self) -> JobCreationRequest {
        JobCreationRequest {
            video_input_url: self.video.clone(),
            audio_input_url: self.audio.clone(),
            text_input: self.text.clone(),
            target_language: self.lang.clone(),
            voice_id: self.voice.clone(),
            character_id: self.avatar.clone(),
            custom_viseme_mapping_id: self.viseme_mapping.clone(),
            emotion_intensity: self.emotion,
            speaking_style: self.style.clone(),
            callback_url: self.callback_url.clone(),
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct CloneArgs {
    /// Amostra de áudio da voz a clonar.
    #[arg(long)]
    pub sample: String,

    /// Nome da nova voz.
    #[arg(long)]
    pub name: String,

    /// Idiomas alvo; pode ser repetido.
    #[arg(long = "lang")]
    pub langs: Vec<String>,

    /// Aguarda o resultado da clonagem e lista as vozes novamente.
    #[arg(long, default_value_t = false)]
    pub wait: bool,
}

impl CloneArgs {
    pub fn to_request(&self) -> VoiceCloneRequest {
        VoiceCloneRequest {
            sample_url: self.sample.clone(),
            voice_name: self.name.clone(),
            target_languages: (!self.langs.is_empty()).then(|| self.langs.clone()),
        }
    }
}
