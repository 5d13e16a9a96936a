//! End-to-end tests over the public API: profile catalog -> parameter
//! resolution -> engine registry -> dispatch through the mock engine.

use std::sync::Arc;
use std::time::Duration;

use cantata_tts::config::{BootstrapConfig, MemoryConfigStore};
use cantata_tts::dispatch::{SynthesisJob, SynthesisService};
use cantata_tts::engine::{classify_voice, init_engines, NamedVoiceCatalog, VoiceRole};
use cantata_tts::params::{builtin_catalog, ParameterResolver, PhonationType, ProfileLookup};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_service(bootstrap: BootstrapConfig) -> SynthesisService {
    init_tracing();
    let band = bootstrap.synthesis.safety_band;
    let registry = init_engines(Arc::new(bootstrap), Arc::new(MemoryConfigStore::new()))
        .expect("built-in engines register cleanly");
    SynthesisService::new(Arc::new(builtin_catalog()), Arc::new(registry), band)
}

fn fast_service() -> SynthesisService {
    let mut bootstrap = BootstrapConfig::default();
    bootstrap.synthesis.mock.delay_ms = 1;
    build_service(bootstrap)
}

#[test]
fn voice_only_resolution_yields_voice_defaults() {
    let catalog = Arc::new(builtin_catalog());
    let resolver = ParameterResolver::new(Arc::clone(&catalog) as Arc<dyn ProfileLookup>);

    let resolved = resolver.resolve("aurora", None, None).unwrap();
    let defaults = catalog.voice("aurora").unwrap().defaults;
    assert_eq!(resolved, defaults);
}

#[test]
fn technique_and_emotion_layer_in_order() {
    let catalog = Arc::new(builtin_catalog());
    let resolver = ParameterResolver::new(catalog);

    let resolved = resolver
        .resolve("kai", Some("belting"), Some("furious"))
        .unwrap();

    // Technique fields replaced wholesale, then emotion modifiers applied:
    // vibrato 35 * 0.7 rounds to 25, tension 85 * 1.5 clamps to 100.
    assert_eq!(resolved.vibrato_depth, 25);
    assert_eq!(resolved.tension, 100);
    assert_eq!(resolved.phonation_type, PhonationType::Mixed);
    assert_eq!(resolved.emotion_intensity, 90);
    assert!((resolved.pitch_variance - 1.4).abs() < 1e-9);
    assert!((resolved.energy_multiplier - 1.5).abs() < 1e-9);
    assert!((resolved.tempo_factor - 1.15).abs() < 1e-9);
    assert!(resolved.scales_in_range());
}

#[test]
fn discrete_voice_heuristic_over_builtin_voices() {
    let catalog = builtin_catalog();
    let voices = NamedVoiceCatalog::default();

    // Feminine range with high breathiness.
    let aurora = catalog.voice("aurora").unwrap().defaults;
    assert_eq!(classify_voice(&aurora), VoiceRole::SoftBreathy);
    assert_eq!(voices.select(&aurora), "shimmer");

    // Masculine range with elevated tension.
    let orion = catalog.voice("orion").unwrap().defaults;
    assert_eq!(classify_voice(&orion), VoiceRole::Powerful);
    assert_eq!(voices.select(&orion), "onyx");

    // Mid-range gender factor is neutral regardless of timbre.
    let kai = catalog.voice("kai").unwrap().defaults;
    assert_eq!(classify_voice(&kai), VoiceRole::Neutral);
    assert_eq!(voices.select(&kai), "alloy");
}

#[tokio::test]
async fn dispatch_full_pipeline_through_mock() {
    let service = fast_service();

    let mut job = SynthesisJob::new("雪花飘落的夜晚", "aurora");
    job.technique_id = Some("breathy-whisper".to_string());
    job.emotion_id = Some("melancholy".to_string());

    let result = service.synthesize(job).await;
    assert!(result.success, "error: {:?}", result.error_message);
    assert_eq!(result.engine, "mock");
    assert!(result.audio_url.is_some());
    assert!(result.duration_seconds > 0.0);
}

#[tokio::test]
async fn dispatch_missing_optional_layers_still_succeeds() {
    let service = fast_service();

    let mut job = SynthesisJob::new("la la la", "kai");
    job.technique_id = Some("no-such-technique".to_string());
    job.emotion_id = Some("no-such-emotion".to_string());

    let result = service.synthesize(job).await;
    assert!(result.success);
}

#[tokio::test]
async fn dispatch_unknown_voice_is_a_failure_result() {
    let service = fast_service();
    let result = service.synthesize(SynthesisJob::new("la", "nobody")).await;
    assert!(!result.success);
    let message = result.error_message.unwrap();
    assert!(message.contains("nobody"), "message: {}", message);
}

#[tokio::test]
async fn dispatch_to_unconfigured_engine_reports_unavailable() {
    let service = fast_service();

    let mut job = SynthesisJob::new("la", "kai");
    job.engine = Some("cloud-tts".to_string());
    let result = service.synthesize(job).await;

    assert!(!result.success);
    assert!(result.error_message.unwrap().contains("unavailable"));
    assert_eq!(result.engine, "cloud-tts");
}

#[tokio::test]
async fn dispatch_timeout_yields_timeout_message() {
    let mut bootstrap = BootstrapConfig::default();
    bootstrap.synthesis.mock.delay_ms = 300;
    let service = build_service(bootstrap);

    let mut job = SynthesisJob::new("la", "kai");
    job.timeout = Some(Duration::from_millis(10));
    let result = service.synthesize(job).await;

    assert!(!result.success);
    assert!(result.error_message.unwrap().contains("timed out"));
}

#[tokio::test]
async fn engine_listing_reports_availability() {
    let service = fast_service();
    let statuses = service.list_engines();

    let names: Vec<&str> = statuses.iter().map(|s| s.descriptor.name.as_str()).collect();
    assert_eq!(names, vec!["cloud-tts", "local-model", "mock"]);

    for status in &statuses {
        let expected = status.descriptor.name == "mock";
        assert_eq!(status.available, expected, "{}", status.descriptor.name);
    }
}
