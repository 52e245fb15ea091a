//! Orchestrator tests driven through fake probe and encoder ports

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;
use vidscrub::app::{AppContainer, CleanRequest};
use vidscrub::cli::commands::run_until_interrupted;
use vidscrub::domain::model::{CodecType, ProbeResult, SelectionConfig, Stream, TargetCodec};
use vidscrub::engine::{JobContext, VideoJob};
use vidscrub::language::LanguageResolver;
use vidscrub::output::OutputWriter;
use vidscrub::ports::{EncodePort, EncodeRequest, MetadataLookupPort, ProbePort};
use vidscrub::streams::mapped_indices;
use vidscrub::DomainError;

// Test utilities

/// Returns queued probe results in order, repeating the last one
struct QueuedProbe {
    results: Mutex<VecDeque<ProbeResult>>,
    last: Mutex<Option<ProbeResult>>,
}

impl QueuedProbe {
    fn new(results: Vec<ProbeResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ProbePort for QueuedProbe {
    async fn probe(&self, _path: &Path) -> Result<ProbeResult, DomainError> {
        let next = self.results.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(result) = next {
            *last = Some(result);
        }
        last.clone()
            .ok_or_else(|| DomainError::ProbeFail("Invalid data found when processing input".to_string()))
    }
}

/// Records requests and writes a small output file for each
#[derive(Default)]
struct RecordingEncoder {
    requests: Mutex<Vec<EncodeRequest>>,
    fail: bool,
}

impl RecordingEncoder {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<EncodeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncodePort for RecordingEncoder {
    async fn encode(&self, request: &EncodeRequest) -> Result<(), DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(DomainError::EncodeFail("Conversion failed!".to_string()));
        }
        std::fs::write(&request.output, request.title.as_bytes())?;
        Ok(())
    }

    fn render_command(&self, request: &EncodeRequest) -> String {
        format!("ffmpeg {}", request.command_args().join(" "))
    }
}

/// Starts writing its output, then never finishes
#[derive(Default)]
struct StalledEncoder {
    started: Notify,
}

#[async_trait]
impl EncodePort for StalledEncoder {
    async fn encode(&self, request: &EncodeRequest) -> Result<(), DomainError> {
        std::fs::write(&request.output, b"partial")?;
        self.started.notify_one();
        std::future::pending::<()>().await;
        Ok(())
    }

    fn render_command(&self, request: &EncodeRequest) -> String {
        format!("ffmpeg {}", request.command_args().join(" "))
    }
}

struct CountingMetadata {
    language: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl MetadataLookupPort for CountingMetadata {
    async fn original_language(&self, _imdb_id: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(self.language.to_string())
    }
}

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    scratch: PathBuf,
    out: PathBuf,
}

fn fixture(file_name: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join(file_name);
    std::fs::write(&input, b"source video").unwrap();
    let scratch = dir.path().join("cache");
    let out = dir.path().join("out");
    Fixture {
        input,
        scratch,
        out,
        _dir: dir,
    }
}

fn probe_of(streams: Vec<Stream>) -> ProbeResult {
    ProbeResult {
        name: "Movie".to_string(),
        streams,
        duration_seconds: Some(3600.0),
        size_bytes: Some(900_000_000),
        ..ProbeResult::default()
    }
}

fn ordered_streams() -> Vec<Stream> {
    vec![
        Stream::new(0, CodecType::Video, "h264").with_dimensions(1920, 1080),
        Stream::new(1, CodecType::Audio, "aac").with_language("eng"),
        Stream::new(2, CodecType::Audio, "aac")
            .with_language("fre")
            .with_title("Commentary"),
        Stream::new(3, CodecType::Subtitle, "subrip").with_language("eng"),
    ]
}

fn context(
    fx: &Fixture,
    probe: Arc<dyn ProbePort>,
    encoder: Arc<dyn EncodePort>,
    resolver: LanguageResolver,
    dry_run: bool,
) -> JobContext {
    JobContext {
        probe,
        encoder,
        resolver: Arc::new(resolver),
        scratch_root: fx.scratch.clone(),
        dry_run,
    }
}

fn scratch_is_empty(fx: &Fixture) -> bool {
    std::fs::read_dir(&fx.scratch)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

// Reorder stage

#[tokio::test]
async fn test_reorder_noop_returns_head_without_encoding() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let head = job.reorder().await.unwrap();

    assert_eq!(head, fx.input);
    assert!(encoder.requests().is_empty());
}

#[tokio::test]
async fn test_reorder_moves_video_first() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(vec![
        Stream::new(0, CodecType::Audio, "aac").with_language("eng"),
        Stream::new(1, CodecType::Video, "h264"),
        Stream::new(2, CodecType::Subtitle, "subrip"),
    ])]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let head = job.reorder().await.unwrap();

    let requests = encoder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].title, "Reorder streams");
    assert_eq!(mapped_indices(&requests[0].args), vec![1, 0, 2]);
    assert_eq!(head.file_name().unwrap(), "1_reorder.mkv");
    assert_eq!(job.head(), head.as_path());
}

#[tokio::test]
async fn test_missing_audio_fails_before_any_command() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(vec![
        Stream::new(0, CodecType::Video, "h264"),
        Stream::new(1, CodecType::Subtitle, "subrip"),
    ])]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let err = job.clean(&SelectionConfig::default()).await.unwrap_err();

    assert_eq!(err, DomainError::NoAudioStreams);
    assert!(encoder.requests().is_empty());
}

#[tokio::test]
async fn test_cover_art_only_has_no_video() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(vec![
        Stream::new(0, CodecType::Video, "mjpeg"),
        Stream::new(1, CodecType::Audio, "aac"),
    ])]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder, LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    assert_eq!(job.reorder().await.unwrap_err(), DomainError::NoVideoStreams);
}

// Conversion stages

#[tokio::test]
async fn test_hevc_source_skips_h265_unless_forced() {
    let fx = fixture("Movie.mkv");
    let hevc = probe_of(vec![
        Stream::new(0, CodecType::Video, "hevc"),
        Stream::new(1, CodecType::Audio, "aac"),
    ]);
    let probe = Arc::new(QueuedProbe::new(vec![hevc]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let head = job.convert(TargetCodec::H265, false).await.unwrap();
    assert_eq!(head, fx.input);
    assert!(encoder.requests().is_empty());

    job.convert(TargetCodec::H265, true).await.unwrap();
    let requests = encoder.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].args.join(" ").contains("-b:v 1000k"));
}

#[tokio::test]
async fn test_h265_without_duration_fails() {
    let fx = fixture("Movie.mkv");
    let mut unknown = probe_of(vec![Stream::new(0, CodecType::Video, "h264")]);
    unknown.duration_seconds = None;
    let probe = Arc::new(QueuedProbe::new(vec![unknown]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder, LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    assert_eq!(
        job.convert(TargetCodec::H265, false).await.unwrap_err(),
        DomainError::DurationUnknown
    );
}

#[tokio::test]
async fn test_vp9_output_is_webm() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let head = job.convert(TargetCodec::Vp9, false).await.unwrap();
    assert_eq!(head.file_name().unwrap(), "1_vp9.webm");
}

#[tokio::test]
async fn test_scale_skips_hd_source() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    job.scale_1080p(false).await.unwrap();
    assert!(encoder.requests().is_empty());
}

// Full pipeline

#[tokio::test]
async fn test_clean_writes_output_and_removes_scratch() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    job.clean(&SelectionConfig::default()).await.unwrap();
    let written = job
        .finish(&OutputWriter::new(Some(fx.out.clone()), false))
        .unwrap()
        .unwrap();

    assert_eq!(written, fx.out.join("Movie.mkv"));
    assert!(written.exists());
    assert!(fx.input.exists());
    assert!(scratch_is_empty(&fx));

    // Reorder was a no-op. With the original language unresolved, the
    // English subtitle is kept next to video 0 and English audio 1.
    let requests = encoder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(mapped_indices(&requests[0].args), vec![0, 1, 3]);
}

#[tokio::test]
async fn test_failed_encode_still_removes_scratch() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())]));
    let encoder = Arc::new(RecordingEncoder::failing());
    let ctx = context(&fx, probe, encoder, LanguageResolver::disabled(), false);

    {
        let mut job = VideoJob::new(ctx, &fx.input).unwrap();
        let err = job.clean(&SelectionConfig::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::EncodeFail(_)));
    }

    assert!(scratch_is_empty(&fx));
}

#[tokio::test]
async fn test_dry_run_never_encodes() {
    let fx = fixture("Movie.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(vec![
        Stream::new(0, CodecType::Audio, "aac"),
        Stream::new(1, CodecType::Video, "h264"),
    ])]));
    let encoder = Arc::new(RecordingEncoder::default());
    let ctx = context(&fx, probe, encoder.clone(), LanguageResolver::disabled(), true);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let head = job.clean(&SelectionConfig::default()).await.unwrap();
    assert_eq!(head, fx.input);
    assert!(encoder.requests().is_empty());
    assert_eq!(job.finish(&OutputWriter::default()).unwrap(), None);
}

#[tokio::test]
async fn test_foreign_original_keeps_local_subtitles_and_resolves_once() {
    let fx = fixture("Spirited Away tt0245429.mkv");
    let probe = Arc::new(QueuedProbe::new(vec![probe_of(vec![
        Stream::new(0, CodecType::Video, "h264"),
        Stream::new(1, CodecType::Audio, "aac").with_language("jpn"),
        Stream::new(2, CodecType::Audio, "aac").with_language("eng"),
        Stream::new(3, CodecType::Subtitle, "subrip").with_language("eng"),
        Stream::new(4, CodecType::Subtitle, "subrip").with_language("fre"),
    ])]));
    let encoder = Arc::new(RecordingEncoder::default());
    let metadata = Arc::new(CountingMetadata {
        language: "ja",
        calls: AtomicUsize::new(0),
    });
    let resolver = LanguageResolver::new(Vec::new(), Some(metadata.clone()));
    let ctx = context(&fx, probe, encoder.clone(), resolver, false);

    let mut job = VideoJob::new(ctx, &fx.input).unwrap();
    let config = SelectionConfig::default();
    job.process_streams(&config).await.unwrap();
    job.process_streams(&config).await.unwrap();

    assert_eq!(metadata.calls.load(Ordering::SeqCst), 1);
    let requests = encoder.requests();
    assert_eq!(mapped_indices(&requests[0].args), vec![0, 1, 2, 3]);
    assert_eq!(requests[0].title, "Process file (drop unwanted subtitles)");
}

#[tokio::test]
async fn test_batch_continues_after_a_failed_file() {
    let fx = fixture("Movie.mkv");
    let second = fx.input.with_file_name("Other.mkv");
    std::fs::write(&second, b"source video").unwrap();

    // First file probes fine, the second has no audio
    let probe = Arc::new(QueuedProbe::new(vec![
        probe_of(ordered_streams()),
        probe_of(ordered_streams()),
        probe_of(vec![Stream::new(0, CodecType::Video, "h264")]),
    ]));
    let encoder = Arc::new(RecordingEncoder::default());
    let container = AppContainer::with_ports(
        probe,
        encoder,
        LanguageResolver::disabled(),
        fx.scratch.clone(),
        false,
    );

    let outcome = container
        .clean_interactor()
        .execute(CleanRequest {
            files: vec![fx.input.clone(), second],
            config: SelectionConfig::default(),
            out_dir: Some(fx.out.clone()),
            overwrite: false,
        })
        .await
        .unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.written, vec![fx.out.join("Movie.mkv")]);
}

#[tokio::test]
async fn test_interrupt_mid_encode_removes_scratch() {
    let fx = fixture("Movie.mkv");
    let encoder = Arc::new(StalledEncoder::default());
    let container = AppContainer::with_ports(
        Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())])),
        encoder.clone(),
        LanguageResolver::disabled(),
        fx.scratch.clone(),
        false,
    );
    let interactor = container.clean_interactor();

    let work = async {
        interactor
            .execute(CleanRequest {
                files: vec![fx.input.clone()],
                config: SelectionConfig::default(),
                out_dir: Some(fx.out.clone()),
                overwrite: false,
            })
            .await?;
        Ok::<_, anyhow::Error>(())
    };
    let err = run_until_interrupted(work, encoder.started.notified())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Interrupted");
    assert!(scratch_is_empty(&fx));
    assert!(!fx.out.join("Movie.mkv").exists());
    assert!(fx.input.exists());
}

#[tokio::test]
async fn test_bad_extension_rejects_whole_batch() {
    let fx = fixture("Movie.mkv");
    let notes = fx.input.with_file_name("notes.txt");
    std::fs::write(&notes, b"text").unwrap();
    let encoder = Arc::new(RecordingEncoder::default());
    let container = AppContainer::with_ports(
        Arc::new(QueuedProbe::new(vec![probe_of(ordered_streams())])),
        encoder.clone(),
        LanguageResolver::disabled(),
        fx.scratch.clone(),
        false,
    );

    let err = container
        .clean_interactor()
        .execute(CleanRequest {
            files: vec![fx.input.clone(), notes],
            config: SelectionConfig::default(),
            out_dir: None,
            overwrite: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::UnsupportedContainer(_)));
    assert!(encoder.requests().is_empty());
}
