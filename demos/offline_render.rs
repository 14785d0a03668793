//! Render a demo song without an audio device and print what happened.
//!
//! Run with: cargo run --example offline_render [arpeggio|groove|loonboon]

use voicelab::{sequencing::songs, EngineConfig, SynthEngine};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 512;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let score = match std::env::args().nth(1).as_deref() {
        None | Some("arpeggio") => songs::arpeggio_in_g(),
        Some("groove") => songs::drum_groove(),
        Some("loonboon") => songs::loonboon(),
        Some(other) => color_eyre::eyre::bail!("unknown song '{other}'"),
    };

    let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);
    let (mut engine, _handle) = SynthEngine::with_default_voices(config);
    engine.load_score(&score);

    // Two extra seconds for release tails
    let frames = ((score.end_time() + 2.0) * f64::from(SAMPLE_RATE)) as usize;
    let mut out = vec![0.0f32; frames];
    let mut busiest = 0;
    for chunk in out.chunks_mut(BLOCK) {
        engine.render_mono(chunk);
        busiest = busiest.max(engine.stats().active_voices);
    }

    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let rms = (out.iter().map(|s| s * s).sum::<f32>() / frames as f32).sqrt();
    let stats = engine.stats();

    println!("Rendered {frames} samples ({:.2} s)", stats.clock);
    println!("  notes:        {}", score.len());
    println!("  peak:         {peak:.3}");
    println!("  rms:          {rms:.4}");
    println!("  max voices:   {busiest}");
    println!("  pool size:    {}", engine.pool().len());
    println!("  dropped:      {}", stats.dropped_notes);
    println!("  still active: {}", stats.active_voices);
    Ok(())
}
