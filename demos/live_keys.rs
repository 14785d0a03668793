//! Drive the engine through its control handle, the way a UI thread would.
//!
//! The engine runs on its own thread here and renders into a buffer instead
//! of a sound card; the main thread plays a short phrase with held notes.
//!
//! Run with: cargo run --example live_keys

use std::{sync::mpsc, thread, time::Duration};

use voicelab::{
    sequencing::notes::midi_to_freq, synth::NoteParams, voices, EngineConfig, SynthEngine,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 256;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);
    let (mut engine, mut handle) = SynthEngine::with_default_voices(config);
    let (done_tx, done_rx) = mpsc::channel();

    // Stand-in for the audio callback: render a block every few ms.
    let audio = thread::spawn(move || {
        let mut out = vec![0.0f32; BLOCK];
        let mut peak = 0.0f32;
        while done_rx.try_recv().is_err() {
            engine.render_mono(&mut out);
            peak = out.iter().fold(peak, |m, s| m.max(s.abs()));
            thread::sleep(Duration::from_secs_f32(BLOCK as f32 / SAMPLE_RATE));
        }
        (engine.stats(), peak)
    });

    // C major arpeggio on the FM voice, each key held for 150 ms
    for key in [60u8, 64, 67, 72] {
        let params = NoteParams::new().with("freq", midi_to_freq(key));
        handle.trigger_on(u32::from(key), voices::FM, params)?;
        thread::sleep(Duration::from_millis(150));
        handle.trigger_off(u32::from(key))?;
    }

    // A chord that only the panic button ends
    for key in [48u8, 55, 64] {
        let params = NoteParams::new()
            .with("frequency", midi_to_freq(key))
            .with("amplitude", 0.1);
        handle.trigger_on(u32::from(key), voices::SINE_ENV, params)?;
    }
    thread::sleep(Duration::from_millis(500));
    handle.all_notes_off()?;
    thread::sleep(Duration::from_millis(500));

    done_tx.send(())?;
    let (stats, peak) = audio
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("audio thread panicked"))?;

    println!(
        "clock {:.2} s, peak {peak:.3}, {} voices still active",
        stats.clock, stats.active_voices
    );
    Ok(())
}
