//! Interface de terminal do `lipsync`: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de acompanhamento e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente cada leitura
//! de status de um job no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use lipsync::{Avatar, CloneHandle, Job, JobStatus, Language, Voice};

/// Indicador visual de progresso para um job em andamento.
///
/// Exibe um spinner com status e porcentagem durante o processamento e mensagens
/// coloridas para sucesso (verde) e falha (vermelho).
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
}

impl JobProgress {
    /// Inicia o spinner para o job informado.
    pub fn start(job_id: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(format!("{job_id}: {}", JobStatus::Accepted));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Atualiza a mensagem do spinner com o snapshot mais recente.
    pub fn update(&self, job: &Job) {
        self.pb
            .set_message(format!("{}: {} ({}%)", job.id, job.status, job.progress));
    }

    /// Finaliza o spinner e exibe o resultado final do job.
    pub fn finish(&self, job: &Job) {
        self.pb.finish_and_clear();
        match job.status {
            JobStatus::Completed => {
                println!(
                    "  {} {} completed in {:.1}s: {}",
                    self.green.apply_to("✓"),
                    job.id,
                    job.processing_time_seconds.unwrap_or_default(),
                    job.output_url.as_deref().unwrap_or("-")
                );
            }
            _ => {
                println!(
                    "  {} {} failed: {}",
                    self.red.apply_to("✗"),
                    job.id,
                    job.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

pub fn print_voices(voices: &[Voice]) {
    let dim = Style::new().dim();
    for voice in voices {
        println!(
            "{:<18} {:<32} [{}] {}",
            voice.id,
            voice.name,
            voice.language_codes.join(","),
            dim.apply_to(&voice.description)
        );
    }
}

pub fn print_avatars(avatars: &[Avatar]) {
    let dim = Style::new().dim();
    for avatar in avatars {
        println!(
            "{:<12} {:<24} {} {}",
            avatar.id,
            avatar.name,
            avatar.viseme_profiles.join(","),
            dim.apply_to(&avatar.description)
        );
    }
}

pub fn print_languages(languages: &[Language]) {
    for language in languages {
        println!("{:<4} {}", language.code, language.name);
    }
}

pub fn print_clone_handle(handle: &CloneHandle) {
    let yellow = Style::new().yellow();
    println!("  {} {} {}", yellow.apply_to("↻"), handle.voice_id, handle.status);
}

/// Imprime qualquer valor serializável como JSON formatado.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
