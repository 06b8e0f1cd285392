// IIIF presentation manifest model and the reader that turns it into an image list.

pub mod model;
pub mod reader;

/// One image to download: the remote resource and the file name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub source_uri: String,
    pub filename: String,
}

/// Images in manifest canvas order.
pub type ImageList = Vec<ImageRef>;
