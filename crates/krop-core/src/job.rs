//! Crop job planning and execution.
//!
//! A job is planned in two pure steps and executed in one effectful step:
//! 1. [`resolve_pages`] turns the page-range text into page numbers
//! 2. [`build_crop_job`] pairs every page with its selection and the rotation
//! 3. [`run_crop_job`] hands the operations to a [`CropBackend`]
//!
//! The backend owns all document I/O. Any failure aborts the whole job.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, CropError};
use crate::geometry::Rect;
use crate::pages::resolve_pages;
use crate::rotation::Rotation;
use crate::selection::SelectionModel;

/// Extract one rectangle from one source page into the output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropOperation {
    /// 1-based page number in the source document.
    pub page: u32,
    /// Crop rectangle in the page's document space.
    pub rect: Rect,
    pub rotation: Rotation,
}

/// Document-cropping capability injected by the host.
///
/// [`run_crop_job`] calls `load_from_file` once, `add_page_cropped` once per
/// operation in order, then `write_to_file` once.
pub trait CropBackend {
    /// Handle to a loaded source document.
    type Document;

    fn load_from_file(&mut self, path: &Path) -> Result<Self::Document, BackendError>;

    fn add_page_cropped(
        &mut self,
        source: &Self::Document,
        operation: &CropOperation,
    ) -> Result<(), BackendError>;

    fn write_to_file(&mut self, path: &Path) -> Result<(), BackendError>;
}

/// Pair every page with its selection and the rotation.
///
/// Pages are kept in order, duplicates included.
///
/// # Errors
///
/// Returns [`CropError::MissingSelection`] for the first page without a
/// rectangle.
pub fn build_crop_job<M>(
    pages: &[u32],
    selections: &M,
    rotation: Rotation,
) -> Result<Vec<CropOperation>, CropError>
where
    M: SelectionModel + ?Sized,
{
    let operations = pages
        .iter()
        .map(|&page| -> Result<CropOperation, CropError> {
            let rect = selections
                .rect_for(page)
                .ok_or(CropError::MissingSelection(page))?;
            Ok(CropOperation {
                page,
                rect,
                rotation,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        operations = operations.len(),
        rotation = rotation.degrees(),
        "built crop job"
    );
    Ok(operations)
}

/// Write `operations` from `source` into `output` through `backend`.
///
/// # Errors
///
/// The first backend failure stops the job. I/O failures surface as
/// [`CropError::BackendIo`], anything else as [`CropError::Unexpected`].
pub fn run_crop_job<B>(
    backend: &mut B,
    source: &Path,
    output: &Path,
    operations: &[CropOperation],
) -> Result<(), CropError>
where
    B: CropBackend + ?Sized,
{
    tracing::debug!(source = %source.display(), "loading source document");
    let document = backend.load_from_file(source)?;

    for operation in operations {
        tracing::trace!(
            page = operation.page,
            rotation = operation.rotation.degrees(),
            "adding cropped page"
        );
        backend.add_page_cropped(&document, operation)?;
    }

    backend.write_to_file(output)?;
    tracing::debug!(
        output = %output.display(),
        pages = operations.len(),
        "wrote cropped document"
    );
    Ok(())
}

/// The user's crop request as entered: page-range text and rotation index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRequest {
    /// Page-range expression; empty means all pages.
    pub pages: String,
    /// Index into [`ROTATION_TABLE`](crate::rotation::ROTATION_TABLE).
    pub rotation_index: usize,
}

impl CropRequest {
    pub fn new(pages: impl Into<String>, rotation_index: usize) -> Self {
        Self {
            pages: pages.into(),
            rotation_index,
        }
    }

    /// Resolve the request against a document with `last_page` pages.
    ///
    /// All input is validated before any operation is built.
    pub fn plan<M>(&self, last_page: u32, selections: &M) -> Result<Vec<CropOperation>, CropError>
    where
        M: SelectionModel + ?Sized,
    {
        let rotation = Rotation::from_index(self.rotation_index)?;
        let pages = resolve_pages(&self.pages, last_page)?;
        build_crop_job(&pages, selections, rotation)
    }
}
