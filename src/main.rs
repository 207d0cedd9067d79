mod cli;
mod ui;

use anyhow::Result;
use clap::Parser;
use tokio::time::sleep;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{CloneArgs, Cli, Command, SubmitArgs};
use lipsync::{
    CloneStatus, JobCreationRequest, MockBackend, SimulatorConfig, VoiceCloneRequest,
    poll_until_terminal,
};
use ui::JobProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load_from(path)?,
        None => SimulatorConfig::load()?,
    };
    if let Some(scale) = cli.time_scale {
        config.time_scale = scale;
        config.validate()?;
    }
    let backend = MockBackend::new(&config);

    match cli.command {
        Command::Submit(args) => submit(&backend, &args, cli.json).await,
        Command::Voices => {
            let voices = backend.list_voices().await?;
            if cli.json {
                ui::print_json(&voices)?;
            } else {
                ui::print_voices(&voices);
            }
            Ok(())
        }
        Command::Avatars => {
            let avatars = backend.list_avatars().await?;
            if cli.json {
                ui::print_json(&avatars)?;
            } else {
                ui::print_avatars(&avatars);
            }
            Ok(())
        }
        Command::Languages => {
            if cli.json {
                ui::print_json(backend.list_languages())?;
            } else {
                ui::print_languages(backend.list_languages());
            }
            Ok(())
        }
        Command::Clone(args) => clone(&backend, &args, cli.json).await,
        Command::Demo => demo(&backend, cli.json).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lipsync=debug" } else { "lipsync=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn submit(backend: &MockBackend, args: &SubmitArgs, json: bool) -> Result<()> {
    let request = args.to_request();
    request.validate()?;

    let handle = backend.submit_job(request).await?;
    if args.no_wait {
        if json {
            ui::print_json(&handle)?;
        } else {
            println!("{} {}", handle.id, handle.status);
        }
        return Ok(());
    }

    let progress = (!json).then(|| JobProgress::start(&handle.id));
    let job = poll_until_terminal(backend, &handle.id, backend.poll_interval(), |job| {
        if let Some(progress) = &progress {
            progress.update(job);
        }
    })
    .await?;

    match &progress {
        Some(progress) => progress.finish(&job),
        None => ui::print_json(&job)?,
    }
    Ok(())
}

async fn clone(backend: &MockBackend, args: &CloneArgs, json: bool) -> Result<()> {
    let handle = backend.clone_voice(args.to_request()).await?;
    if json {
        ui::print_json(&handle)?;
    } else {
        ui::print_clone_handle(&handle);
    }

    if args.wait {
        wait_for_clone(backend, &handle.voice_id).await?;
        let voices = backend.list_voices().await?;
        if json {
            ui::print_json(&voices)?;
        } else {
            ui::print_voices(&voices);
        }
    }
    Ok(())
}

async fn wait_for_clone(backend: &MockBackend, voice_id: &str) -> Result<CloneStatus> {
    loop {
        let voice = backend.get_voice(voice_id).await?;
        match voice.clone_status {
            Some(CloneStatus::Pending) => sleep(backend.poll_interval()).await,
            Some(status) => return Ok(status),
            None => anyhow::bail!("{voice_id} is not a cloned voice"),
        }
    }
}

/// Runs one succeeding job, one failing job and one clone side by side.
async fn demo(backend: &MockBackend, json: bool) -> Result<()> {
    let ok = backend
        .submit_job(JobCreationRequest::new("ok.mp4", "en").with_audio("a.mp3"))
        .await?;
    let failing = backend
        .submit_job(JobCreationRequest::new("fail_case_1.mp4", "en").with_audio("a.mp3"))
        .await?;
    let cloned = backend
        .clone_voice(VoiceCloneRequest::new("s.mp3", "X"))
        .await?;

    let interval = backend.poll_interval();
    let (ok_job, failed_job, clone_status) = tokio::try_join!(
        async {
            poll_until_terminal(backend, &ok.id, interval, |_| {})
                .await
                .map_err(anyhow::Error::from)
        },
        async {
            poll_until_terminal(backend, &failing.id, interval, |_| {})
                .await
                .map_err(anyhow::Error::from)
        },
        wait_for_clone(backend, &cloned.voice_id),
    )?;

    if json {
        ui::print_json(&serde_json::json!({
            "jobs": [ok_job, failed_job],
            "clone": { "voice_id": cloned.voice_id, "status": clone_status },
        }))?;
        return Ok(());
    }

    println!(
        "{}: {} ({}s)",
        ok_job.id,
        ok_job.status,
        ok_job.processing_time_seconds.unwrap_or_default()
    );
    println!(
        "{}: {} ({})",
        failed_job.id,
        failed_job.status,
        failed_job.error_message.as_deref().unwrap_or("-")
    );
    println!("{}: {}", cloned.voice_id, clone_status);
    Ok(())
}
