//! Rendering collaborators backed by external programs.
//!
//! Pages go through an HTML-to-image tool (`wkhtmltoimage` by default) and
//! the images are laid onto PDF pages by `img2pdf`. Each call works in its
//! own scratch directory, removed when the call ends or is cancelled.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use uuid::Uuid;

use super::{
    export::{DocumentAssembler, PageDescriptor, PageRenderer, RasterImage, RenderError, RenderFuture},
    layout::PageFormat,
};

pub struct CommandPageRenderer {
    program: String,
    work_root: PathBuf,
}

impl CommandPageRenderer {
    pub fn new(program: impl Into<String>, work_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_root: work_root.into(),
        }
    }
}

impl PageRenderer for CommandPageRenderer {
    fn render<'a>(&'a self, page: &'a PageDescriptor) -> RenderFuture<'a, RasterImage> {
        Box::pin(async move {
            let scratch = ScratchDir::create(&self.work_root).await?;
            let input = scratch.path().join("page.html");
            let output = scratch.path().join("page.png");
            tokio::fs::write(&input, page.markup.as_bytes()).await?;

            let mut command = Command::new(&self.program);
            command
                .arg("--quiet")
                .args(["--format", "png"])
                .args(["--encoding", "utf-8"])
                .arg("--width")
                .arg(page.size.width_px.to_string())
                .arg("--height")
                .arg(page.size.height_px.to_string())
                .arg("--zoom")
                .arg(page.scale.to_string())
                .arg(&input)
                .arg(&output);
            run(&self.program, &mut command).await?;

            let png = tokio::fs::read(&output).await?;
            tracing::debug!(page = page.number, bytes = png.len(), "page rasterized");
            Ok(RasterImage {
                number: page.number,
                size: page.size,
                png,
            })
        })
    }
}

pub struct CommandAssembler {
    program: String,
    work_root: PathBuf,
}

impl CommandAssembler {
    pub fn new(program: impl Into<String>, work_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_root: work_root.into(),
        }
    }
}

impl DocumentAssembler for CommandAssembler {
    fn assemble<'a>(&'a self, pages: &'a [RasterImage], format: PageFormat) -> RenderFuture<'a, Vec<u8>> {
        Box::pin(async move {
            if pages.is_empty() {
                return Err(RenderError::NoPages);
            }
            let scratch = ScratchDir::create(&self.work_root).await?;

            let mut files = Vec::with_capacity(pages.len());
            for page in pages {
                let path = scratch.path().join(format!("page-{:03}.png", page.number));
                tokio::fs::write(&path, &page.png).await?;
                files.push(path);
            }
            let output = scratch.path().join("quote.pdf");

            // img2pdf centres the image, so an image box of page minus twice
            // the margin lands exactly inside the margin.
            let mut command = Command::new(&self.program);
            command
                .arg("--pagesize")
                .arg(format!("{}mmx{}mm", format.width_mm, format.height_mm))
                .arg("--imgsize")
                .arg(format!(
                    "{}mmx{}mm",
                    format.content_width_mm(),
                    format.content_height_mm()
                ))
                .arg("--output")
                .arg(&output)
                .args(&files);
            run(&self.program, &mut command).await?;

            Ok(tokio::fs::read(&output).await?)
        })
    }
}

async fn run(program: &str, command: &mut Command) -> Result<(), RenderError> {
    let output = command.kill_on_drop(true).output().await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(RenderError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    async fn create(root: &Path) -> std::io::Result<Self> {
        let path = root.join(format!("quote-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "scratch dir cleanup failed");
        }
    }
}
