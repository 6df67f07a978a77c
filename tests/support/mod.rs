#![allow(dead_code)]

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Stdio};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

const AWS_STUB: &str = r##"#!/bin/sh
echo "aws $*" >> "$STUB_LOG"
case "$1 $2" in
  "sts get-caller-identity")
    if [ -n "$STUB_AWS_UNAUTHENTICATED" ]; then
      echo "Unable to locate credentials. You can configure credentials by running \"aws configure\"." >&2
      exit 255
    fi
    echo '{"Account": "123456789012"}'
    exit 0
    ;;
  "configure get")
    if [ -n "$STUB_REGION" ]; then
      echo "$STUB_REGION"
      exit 0
    fi
    exit 1
    ;;
  "lambda publish-layer-version")
    for arg in "$@"; do
      case "$arg" in
        fileb://*)
          f="${arg#fileb://}"
          if [ -f "$f" ]; then
            echo "archive-present $(basename "$f")" >> "$STUB_LOG"
            cp "$f" "$STUB_CAPTURE/"
          fi
          ;;
      esac
    done
    if [ -n "$STUB_PUBLISH_FAIL" ]; then
      echo "An error occurred (AccessDeniedException) when calling the PublishLayerVersion operation" >&2
      exit 254
    fi
    echo '{"Version": 1, "LayerVersionArn": "arn:aws:lambda:us-east-1:123456789012:layer:demo-layer:1"}'
    exit 0
    ;;
  "lambda list-layers")
    if [ -n "$STUB_LIST_FAIL" ]; then
      echo "An error occurred (AccessDeniedException) when calling the ListLayers operation" >&2
      exit 254
    fi
    echo '{"Layers": [{"LayerName": "alpha-layer", "LatestMatchingVersion": {"Version": 2}}, {"LayerName": "beta-layer", "LatestMatchingVersion": {"Version": 5}}]}'
    exit 0
    ;;
  "lambda delete-layer-version")
    if [ -n "$STUB_DELETE_FAIL" ]; then
      echo "An error occurred (ResourceNotFoundException)" >&2
      exit 254
    fi
    exit 0
    ;;
esac
echo "unexpected aws call: $*" >&2
exit 2
"##;

const PIP_STUB: &str = r##"#!/bin/sh
echo "pip $*" >> "$STUB_LOG"
if [ -n "$STUB_INSTALL_SLEEP" ]; then
  sleep "$STUB_INSTALL_SLEEP"
fi
if [ -n "$STUB_INSTALL_FAIL" ]; then
  echo "ERROR: No matching distribution found for $4" >&2
  exit 1
fi
target="$3"
shift 3
for pkg in "$@"; do
  mkdir -p "$target/$pkg"
  echo "# $pkg" > "$target/$pkg/__init__.py"
done
"##;

const NPM_STUB: &str = r##"#!/bin/sh
echo "npm $*" >> "$STUB_LOG"
if [ -n "$STUB_INSTALL_FAIL" ]; then
  echo "npm ERR! 404 Not Found - GET https://registry.npmjs.org/$4" >&2
  exit 1
fi
target="$3"
shift 3
for pkg in "$@"; do
  mkdir -p "$target/node_modules/$pkg"
  echo "{\"name\": \"$pkg\"}" > "$target/node_modules/$pkg/package.json"
done
"##;

/// A sandbox with stub `aws`, `pip` and `npm` binaries and a private TMPDIR.
pub struct Sandbox {
    dir: TempDir,
    pub bin: PathBuf,
    pub tmp: PathBuf,
    pub capture: PathBuf,
    pub log: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let bin = root.join("bin");
        let tmp = root.join("tmp");
        let capture = root.join("capture");
        for path in [&bin, &tmp, &capture] {
            fs::create_dir_all(path).unwrap();
        }
        write_stub(&bin, "aws", AWS_STUB);
        write_stub(&bin, "pip", PIP_STUB);
        write_stub(&bin, "npm", NPM_STUB);
        Self {
            log: root.join("calls.log"),
            dir,
            bin,
            tmp,
            capture,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn env(&self) -> Vec<(&'static str, OsString)> {
        vec![
            ("LAYERGEN_BIN_AWS", self.bin.join("aws").into()),
            ("LAYERGEN_BIN_PIP", self.bin.join("pip").into()),
            ("LAYERGEN_BIN_NPM", self.bin.join("npm").into()),
            ("LAYERGEN_CONFIG", self.root().join("config.toml").into()),
            ("TMPDIR", self.tmp.clone().into()),
            ("STUB_LOG", self.log.clone().into()),
            ("STUB_CAPTURE", self.capture.clone().into()),
        ]
    }

    /// The CLI wired to the stubs; stdin is empty, so prompting is disabled.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("layergen");
        cmd.envs(self.env())
            .env_remove("STUB_REGION")
            .env_remove("LAYERGEN_LOG")
            .write_stdin("");
        cmd
    }

    /// Same wiring as [`Sandbox::cmd`], for runs that must be signalled mid-flight.
    pub fn spawnable(&self) -> process::Command {
        let mut cmd = process::Command::new(env!("CARGO_BIN_EXE_layergen"));
        cmd.envs(self.env())
            .env_remove("STUB_REGION")
            .env_remove("LAYERGEN_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|raw| raw.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }

    pub fn tmp_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.tmp)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    pub fn captured_archive(&self, file_name: &str) -> PathBuf {
        self.capture.join(file_name)
    }
}

fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    path
}
