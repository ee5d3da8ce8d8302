//! Integration tests for kiln-core, driven through the public API with
//! hand-written port fakes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kiln_core::application::ApplicationError;
use kiln_core::prelude::*;
use serde_json::{Value, json};

/// Files keyed by path; directories are implied by their children.
#[derive(Default)]
struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl FakeFs {
    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    fn read(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, _path: &Path) -> KilnResult<()> {
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KilnResult<Option<String>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().keys().any(|p| p.starts_with(path))
    }

    fn list_dir(&self, path: &Path) -> KilnResult<Vec<String>> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.dedup();
        Ok(names)
    }

    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let mut files = self.files.lock().unwrap();
        let moved: Vec<PathBuf> = files.keys().filter(|p| p.starts_with(from)).cloned().collect();
        for old in moved {
            let content = files.remove(&old).unwrap();
            let new = to.join(old.strip_prefix(from).unwrap());
            files.insert(new, content);
        }
        Ok(())
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let mut files = self.files.lock().unwrap();
        let copied: Vec<(PathBuf, String)> = files
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, c)| (to.join(p.strip_prefix(from).unwrap()), c.clone()))
            .collect();
        files.extend(copied);
        Ok(())
    }
}

struct NotInstalled;

impl EngineProbe for NotInstalled {
    fn probe(&self, _command: &str) -> EngineAvailability {
        EngineAvailability::NotFound
    }
}

struct Installed;

impl EngineProbe for Installed {
    fn probe(&self, command: &str) -> EngineAvailability {
        EngineAvailability::Available(PathBuf::from("/usr/bin").join(command))
    }
}

/// Pretends to be the engine: writes one file per `key=value` argument
/// under `out/`.
struct FakeEngine {
    fs: Arc<FakeFs>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeEngine {
    fn render(&self, args: &[String], output_dir: &Path) {
        for pair in args.iter().filter(|a| a.contains('=')) {
            let (key, value) = pair.split_once('=').unwrap();
            self.fs
                .write_file(&output_dir.join("out").join(key), value)
                .unwrap();
        }
        self.calls.lock().unwrap().push(args.to_vec());
    }
}

impl ProcessRunner for FakeEngine {
    fn execute(&self, invocation: &ProcessInvocation, log: &LogStream) -> KilnResult<()> {
        log.line(OutputStream::Stdout, "rendering locally");
        // `copy <args..> <template> <destination> --trust`; the engine writes
        // into the destination's parent for this fake.
        let destination = PathBuf::from(&invocation.args[invocation.args.len() - 2]);
        let parent = destination.parent().unwrap().to_path_buf();
        self.render(&invocation.args, &parent);
        Ok(())
    }
}

impl ContainerRunner for FakeEngine {
    fn run_container(&self, invocation: &ContainerInvocation, log: &LogStream) -> KilnResult<()> {
        log.line(OutputStream::Stderr, "rendering in container");
        let host_output = invocation
            .mounts
            .iter()
            .find(|m| m.container == "/output")
            .map(|m| m.host.clone())
            .unwrap();
        self.render(&invocation.args, &host_output);
        Ok(())
    }
}

struct FakeFetcher {
    fs: Arc<FakeFs>,
}

impl ContentFetcher for FakeFetcher {
    fn fetch(&self, _source: &SourceLocator, destination: &Path) -> KilnResult<()> {
        self.fs.write_file(
            &destination.join("copier.json"),
            r#"{"name": "default", "license": "MIT"}"#,
        )?;
        self.fs.write_file(&destination.join("README.md.jinja"), "# {{ name }}")
    }
}

fn values(value: Value) -> CallerValues {
    CallerValues::try_from_value(value).unwrap()
}

#[test]
fn container_fallback_end_to_end() {
    let fs = Arc::new(FakeFs::default());
    let engine = Arc::new(FakeEngine {
        fs: Arc::clone(&fs),
        calls: Mutex::new(Vec::new()),
    });

    let executor = RenderExecutor::new(fs.clone(), Arc::new(NotInstalled), engine.clone())
        .with_container_runner(engine.clone());
    let action = FetchTemplateAction::new(
        Arc::new(FakeFetcher { fs: fs.clone() }),
        fs.clone(),
        executor,
    );

    let request = FetchRequest::new("https://example.com/tpl.git#v1", values(json!({
        "name": "billing",
        "destination": {"owner": "payments"}
    })))
    .with_target_path("services/billing");

    let log = LogStream::new();
    let outcome = action
        .execute(&request, Path::new("/ws"), Path::new("/out"), &log)
        .unwrap();

    assert_eq!(outcome.strategy, Strategy::Container);
    assert_eq!(outcome.output_dir, PathBuf::from("/out/services/billing"));
    assert_eq!(fs.read("/out/services/billing/name").as_deref(), Some("billing"));
    assert_eq!(fs.read("/out/services/billing/owner").as_deref(), Some("payments"));
    assert_eq!(fs.read("/out/services/billing/license").as_deref(), Some("MIT"));
    assert_eq!(log.tail(), vec!["rendering in container"]);

    let manifest: Value = serde_json::from_str(&fs.read("/ws/template/copier.json").unwrap()).unwrap();
    assert_eq!(manifest["destination"], json!({"owner": "payments"}));
    assert_eq!(manifest["license"], json!("MIT"));
}

#[test]
fn local_engine_end_to_end() {
    let fs = Arc::new(FakeFs::default());
    let engine = Arc::new(FakeEngine {
        fs: Arc::clone(&fs),
        calls: Mutex::new(Vec::new()),
    });

    let executor = RenderExecutor::new(fs.clone(), Arc::new(Installed), engine.clone());
    let action = FetchTemplateAction::new(
        Arc::new(FakeFetcher { fs: fs.clone() }),
        fs.clone(),
        executor,
    );

    let request = FetchRequest::new("/srv/templates/service", values(json!({"name": "api"})));
    let outcome = action
        .execute(&request, Path::new("/ws"), Path::new("/out"), &LogStream::new())
        .unwrap();

    assert_eq!(outcome.strategy, Strategy::Local);
    assert_eq!(fs.read("/out/name").as_deref(), Some("api"));

    let calls = engine.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].first().map(String::as_str), Some("copy"));
    assert_eq!(calls[0].last().map(String::as_str), Some("--trust"));
}

#[test]
fn empty_render_is_reported() {
    struct SilentEngine;
    impl ProcessRunner for SilentEngine {
        fn execute(&self, _: &ProcessInvocation, _: &LogStream) -> KilnResult<()> {
            Ok(())
        }
    }

    let fs = Arc::new(FakeFs::default().with_file("/ws/template/copier/copier.json", "{}"));
    let executor = RenderExecutor::new(fs.clone(), Arc::new(Installed), Arc::new(SilentEngine));
    let layout = StagingLayout::new("/ws", &EngineSpec::copier());

    let err = executor
        .run(&RenderRequest::new(layout, CallerValues::default()))
        .unwrap_err();

    assert!(matches!(
        err,
        KilnError::Application(ApplicationError::NoOutputGenerated { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Execution);
}
