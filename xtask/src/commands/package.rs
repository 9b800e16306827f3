//! Plugin packaging: zips the release bundle into a distributable archive.

use crate::commands::web::trunk_release_build;
use crate::manifest::PluginManifest;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use crate::XtaskCommand;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundle prefix whose files are stored without compression.
pub const STORED_PREFIX: &str = "assets/fonts/";

const DEFLATE_LEVEL: i32 = 9;

/// Parsed `package` options.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PackageOptions {
    /// Reuse the existing bundle instead of running a release build first.
    pub skip_build: bool,
    /// Bundle directory override.
    pub bundle: Option<PathBuf>,
    /// Output directory override.
    pub out: Option<PathBuf>,
    /// Manifest override.
    pub manifest: Option<PathBuf>,
}

/// `cargo xtask package`
pub struct PackageCommand;

impl XtaskCommand for PackageCommand {
    type Options = PackageOptions;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        let mut options = PackageOptions::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--skip-build" => options.skip_build = true,
                "--bundle" => options.bundle = Some(path_value(arg, iter.next())?),
                "--out" => options.out = Some(path_value(arg, iter.next())?),
                "--manifest" => options.manifest = Some(path_value(arg, iter.next())?),
                other => {
                    return Err(XtaskError::validation(format!(
                        "unknown package argument: {other}"
                    )))
                }
            }
        }
        Ok(options)
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()> {
        if !options.skip_build && options.bundle.is_none() {
            trunk_release_build(ctx, Vec::new())?;
        }

        let artifacts = ctx.artifacts();
        let bundle = options
            .bundle
            .as_deref()
            .map(|path| artifacts.resolve_path(path))
            .unwrap_or_else(|| artifacts.bundle_dir());
        let manifest_path = options
            .manifest
            .as_deref()
            .map(|path| artifacts.resolve_path(path))
            .unwrap_or_else(|| artifacts.plugin_manifest());
        let out_dir = options
            .out
            .as_deref()
            .map(|path| artifacts.resolve_path(path))
            .unwrap_or_else(|| artifacts.package_dir());

        let manifest = PluginManifest::load(&manifest_path)?;
        artifacts.ensure_dir(&out_dir)?;
        let archive = out_dir.join(manifest.archive_name()?);
        let count = write_archive(&bundle, &archive)
            .map_err(|err| err.with_operation("package"))?;
        println!("packaged {count} files into {}", archive.display());
        Ok(())
    }
}

fn path_value(flag: &str, value: Option<&String>) -> XtaskResult<PathBuf> {
    value
        .map(PathBuf::from)
        .ok_or_else(|| XtaskError::validation(format!("`{flag}` expects a path")))
}

/// Zip every file under `bundle` into `archive`, returning the number of files written.
///
/// Entry names are bundle-relative with `/` separators. Files under [`STORED_PREFIX`] are stored;
/// everything else is deflated.
pub fn write_archive(bundle: &Path, archive: &Path) -> XtaskResult<usize> {
    if !bundle.is_dir() {
        return Err(XtaskError::environment("bundle directory does not exist")
            .with_path(bundle)
            .with_hint("run `cargo xtask build-web` first"));
    }

    let file = File::create(archive).map_err(|err| {
        XtaskError::io(format!("failed to create archive: {err}")).with_path(archive)
    })?;
    let mut zip = ZipWriter::new(file);
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(DEFLATE_LEVEL));

    let mut count = 0;
    for entry in WalkDir::new(bundle).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry_name(bundle, entry.path())?;
        let options = if name.starts_with(STORED_PREFIX) {
            stored
        } else {
            deflated
        };
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(entry.path()).map_err(|err| {
            XtaskError::io(format!("failed to read bundle file: {err}")).with_path(entry.path())
        })?;
        io::copy(&mut source, &mut zip)?;
        count += 1;
    }

    let mut file = zip.finish()?;
    file.flush()?;
    Ok(count)
}

fn entry_name(bundle: &Path, path: &Path) -> XtaskResult<String> {
    let relative = path.strip_prefix(bundle).map_err(|_| {
        XtaskError::io("bundle entry escapes the bundle directory").with_path(path)
    })?;
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use std::time::{SystemTime, UNIX_EPOCH};
    use zip::ZipArchive;

    fn unique_temp_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "xtask-package-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write");
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parse_reads_flags_and_paths() {
        let options =
            PackageCommand::parse(&args(&["--skip-build", "--bundle", "dist", "--out", "out"]))
                .expect("parse");
        assert_eq!(
            options,
            PackageOptions {
                skip_build: true,
                bundle: Some(PathBuf::from("dist")),
                out: Some(PathBuf::from("out")),
                manifest: None,
            }
        );
        assert!(PackageCommand::parse(&args(&["--bundle"])).is_err());
        assert!(PackageCommand::parse(&args(&["--zip"])).is_err());
    }

    #[test]
    fn archive_stores_fonts_and_deflates_everything_else() {
        let root = unique_temp_root();
        let bundle = root.join("bundle");
        write(&bundle.join("index.html"), "<html></html>");
        write(&bundle.join("assets/app.js"), &"console.log(1);\n".repeat(64));
        write(&bundle.join("assets/fonts/inter.woff2"), "font-bytes");
        let archive = root.join("plugin.zip");

        let count = write_archive(&bundle, &archive).expect("archive");
        assert_eq!(count, 3);

        let mut zip = ZipArchive::new(File::open(&archive).expect("open")).expect("zip");
        let mut names: Vec<String> = zip.file_names().map(ToString::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["assets/app.js", "assets/fonts/inter.woff2", "index.html"]
        );

        let font = zip.by_name("assets/fonts/inter.woff2").expect("font");
        assert_eq!(font.compression(), CompressionMethod::Stored);
        drop(font);

        let mut script = zip.by_name("assets/app.js").expect("script");
        assert_eq!(script.compression(), CompressionMethod::Deflated);
        let mut text = String::new();
        script.read_to_string(&mut text).expect("read");
        assert!(text.starts_with("console.log(1);"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_bundle_is_an_environment_error() {
        let root = unique_temp_root();
        let err = write_archive(&root.join("missing"), &root.join("out.zip")).expect_err("missing");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Environment
        );
        assert!(err.hint.is_some());
    }

    #[test]
    fn run_packages_prebuilt_bundle_under_manifest_name() {
        let root = unique_temp_root();
        write(
            &root.join("crates/site/public/config.json"),
            r#"{"name":{"ru":"Счётчик"},"version":"0.3.1"}"#,
        );
        write(&root.join("crates/site/target/trunk-dist/index.html"), "<html></html>");

        let ctx = CommandContext::at(root.clone());
        PackageCommand::run(
            &ctx,
            PackageOptions {
                skip_build: true,
                ..PackageOptions::default()
            },
        )
        .expect("package");

        assert!(root.join(".artifacts/package/Счётчик-0.3.1.zip").is_file());
        let _ = fs::remove_dir_all(root);
    }
}
