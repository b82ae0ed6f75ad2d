//! Image file I/O and output path generation

use crate::grid::{GridError, PixelGrid};
use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for image file operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image decoding or encoding error
    Image(image::ImageError),
    /// Grid could not be converted to an image
    Grid(GridError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::Grid(e) => write!(f, "Grid error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::Grid(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

impl From<GridError> for OutputError {
    fn from(e: GridError) -> Self {
        OutputError::Grid(e)
    }
}

/// Open an image file as a pixel grid.
///
/// RGB images keep three channels; every other color type is converted to
/// RGBA.
pub fn load_grid(path: &Path) -> Result<PixelGrid, OutputError> {
    let image = image::open(path)?;
    Ok(PixelGrid::from_image(&image))
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Convert a grid to RGBA, upscale it and save it as PNG.
pub fn save_grid(grid: &PixelGrid, path: &Path, scale: u32) -> Result<(), OutputError> {
    let image = scale_image(grid.to_rgba_image()?, scale);
    save_png(&image, path)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Nearest-neighbor keeps every output pixel an exact palette color.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Generate the output path for a processed input file.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{input_dir}/{input_stem}_{tag}.{ext}` |
/// | `-o out.png`, single input | `out.png` |
/// | `-o out.png`, several inputs | `out_{input_stem}.png` |
/// | `-o dir/` | `dir/{input_stem}.{ext}` |
pub fn generate_output_path(
    input: &Path,
    tag: &str,
    extension: &str,
    output_arg: Option<&Path>,
    is_single_input: bool,
) -> PathBuf {
    let input_stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");

    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();

            if is_dir {
                output.join(format!("{}.{}", input_stem, extension))
            } else if is_single_input {
                output.to_path_buf()
            } else {
                let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                let ext = output.extension().and_then(|s| s.to_str()).unwrap_or(extension);
                output.with_file_name(format!("{}_{}.{}", stem, input_stem, ext))
            }
        }
        None => {
            let parent = input.parent().unwrap_or(Path::new(""));
            parent.join(format!("{}_{}.{}", input_stem, tag, extension))
        }
    }
}
