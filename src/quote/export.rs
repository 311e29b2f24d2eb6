use std::{future::Future, pin::Pin, sync::Arc};

use futures::future::try_join_all;
use serde::Serialize;
use thiserror::Error;

use super::{
    QuoteDocument, QuoteError,
    layout::{PageFormat, RasterSize},
    paginator::PageKind,
    render::QuoteTemplates,
    settings::QuoteSettings,
};

pub type RenderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RenderError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("page {got} returned where page {expected} was expected")]
    PageOutOfOrder { expected: usize, got: usize },

    #[error("nothing to assemble")]
    NoPages,
}

/// One page ready for rasterization: markup plus the fixed pixel box it
/// must be drawn into.
#[derive(Debug, Clone, Serialize)]
pub struct PageDescriptor {
    pub number: usize,
    pub kind: PageKind,
    pub markup: String,
    pub size: RasterSize,
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct RasterImage {
    pub number: usize,
    pub size: RasterSize,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct QuoteFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ExportedQuote {
    pub file: QuoteFile,
    pub page_count: usize,
}

/// Turns one page descriptor into a raster image.
pub trait PageRenderer: Send + Sync {
    fn render<'a>(&'a self, page: &'a PageDescriptor) -> RenderFuture<'a, RasterImage>;
}

/// Lays ordered page images onto physical pages, one image per page inside
/// the margin, and returns the finished document bytes.
pub trait DocumentAssembler: Send + Sync {
    fn assemble<'a>(&'a self, pages: &'a [RasterImage], format: PageFormat) -> RenderFuture<'a, Vec<u8>>;
}

pub fn quote_file_name(order_code: &str) -> String {
    format!("orcamento_{order_code}.pdf")
}

#[derive(Clone)]
pub struct QuoteExporter {
    settings: Arc<QuoteSettings>,
    templates: Arc<QuoteTemplates>,
    renderer: Arc<dyn PageRenderer>,
    assembler: Arc<dyn DocumentAssembler>,
}

impl QuoteExporter {
    pub fn new(
        settings: QuoteSettings,
        renderer: Arc<dyn PageRenderer>,
        assembler: Arc<dyn DocumentAssembler>,
    ) -> Result<Self, QuoteError> {
        if settings.items_per_page == 0 {
            return Err(QuoteError::InvalidCapacity);
        }
        Ok(Self {
            settings: Arc::new(settings),
            templates: Arc::new(QuoteTemplates::new()?),
            renderer,
            assembler,
        })
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Plan the document and render every page's markup.
    pub fn describe(&self, doc: &QuoteDocument) -> Result<Vec<PageDescriptor>, QuoteError> {
        let plan = doc.page_plan(self.settings.items_per_page)?;
        let size = self
            .settings
            .page_format
            .content_box_px(self.settings.render_scale);

        plan.pages()
            .iter()
            .map(|page| {
                Ok(PageDescriptor {
                    number: page.number,
                    kind: page.kind,
                    markup: self
                        .templates
                        .render_page(doc, &plan, page, &self.settings)?,
                    size,
                    scale: self.settings.render_scale,
                })
            })
            .collect()
    }

    /// Render all pages and assemble them in page order. Any page failure
    /// aborts the whole export; no partial document is returned.
    pub async fn export(&self, doc: &QuoteDocument) -> Result<ExportedQuote, QuoteError> {
        let pages = self.describe(doc)?;

        let mut images = try_join_all(pages.iter().map(|page| self.renderer.render(page)))
            .await
            .inspect_err(|err| {
                tracing::error!(order_code = %doc.order_code, error = %err, "page render failed");
            })?;

        images.sort_by_key(|image| image.number);
        for (index, image) in images.iter().enumerate() {
            if image.number != index + 1 {
                return Err(RenderError::PageOutOfOrder {
                    expected: index + 1,
                    got: image.number,
                }
                .into());
            }
        }

        let bytes = self
            .assembler
            .assemble(&images, self.settings.page_format)
            .await
            .inspect_err(|err| {
                tracing::error!(order_code = %doc.order_code, error = %err, "quote assembly failed");
            })?;

        tracing::info!(order_code = %doc.order_code, pages = pages.len(), bytes = bytes.len(), "quote exported");

        Ok(ExportedQuote {
            file: QuoteFile {
                file_name: quote_file_name(&doc.order_code),
                content_type: "application/pdf",
                bytes,
            },
            page_count: pages.len(),
        })
    }
}
