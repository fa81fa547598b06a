use argh::FromArgs;
use std::path::PathBuf;

use pixelab::image::PixelBuffer;
use pixelab::imgproc::{
    color, enhance,
    filter::{self, kernels},
    histogram, normalize, threshold,
};
use pixelab::io;

#[derive(FromArgs)]
/// Apply one transform to an image and save the result
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image, not needed by `histogram`
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// convert color images to grayscale before a threshold
    #[argh(switch)]
    auto_gray: bool,

    #[argh(subcommand)]
    op: Op,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Op {
    Histogram(HistogramArgs),
    EqualizeGray(EqualizeGrayArgs),
    EqualizeYcrcb(EqualizeYcrcbArgs),
    Normalize(NormalizeArgs),
    Gamma(GammaArgs),
    Gray(GrayArgs),
    Binary(BinaryArgs),
    Otsu(OtsuArgs),
    Niblack(NiblackArgs),
    Convolve(ConvolveArgs),
    BoxBlur(BoxBlurArgs),
    GaussianBlur(GaussianBlurArgs),
    Median(MedianArgs),
    Kuwahara(KuwaharaArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "histogram")]
/// print the histogram of every channel
struct HistogramArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "equalize-gray")]
/// equalize the luma and return it as a gray RGB image
struct EqualizeGrayArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "equalize-ycrcb")]
/// equalize the Y channel and keep the chroma
struct EqualizeYcrcbArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "normalize")]
/// stretch the sample range to [low, high]
struct NormalizeArgs {
    /// lower bound of the output range
    #[argh(option, default = "0")]
    low: u8,

    /// upper bound of the output range
    #[argh(option, default = "255")]
    high: u8,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "gamma")]
/// apply gamma correction
struct GammaArgs {
    /// the gamma exponent, above 1 darkens
    #[argh(option, default = "1.0")]
    gamma: f64,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "gray")]
/// convert to a single channel grayscale image
struct GrayArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "binary")]
/// binary threshold of a grayscale image
struct BinaryArgs {
    /// samples at or above this value become 255
    #[argh(option, default = "127")]
    thresh: u8,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "otsu")]
/// threshold a grayscale image with Otsu's method
struct OtsuArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "niblack")]
/// adaptive Niblack threshold of a grayscale image
struct NiblackArgs {
    /// side of the local window, odd
    #[argh(option, default = "25")]
    kernel_size: usize,

    /// weight of the local standard deviation
    #[argh(option, default = "0.6")]
    k: f32,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "convolve")]
/// correlate with a kernel of the bank
struct ConvolveArgs {
    /// kernel name, e.g. "sobel 45", or its index in the bank
    #[argh(option)]
    kernel: kernels::KernelName,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "box-blur")]
/// blur with a 3x3 box filter
struct BoxBlurArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "gaussian-blur")]
/// blur with a 5x5 gaussian filter
struct GaussianBlurArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "median")]
/// median filter
struct MedianArgs {
    /// side of the window, 3 or 5
    #[argh(option, default = "3")]
    kernel_size: usize,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "kuwahara")]
/// edge preserving Kuwahara filter
struct KuwaharaArgs {
    /// side of the window, odd
    #[argh(option, default = "5")]
    kernel_size: usize,
}

fn binarization_input(
    image: PixelBuffer,
    auto_gray: bool,
) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    if auto_gray && !image.is_grayscale() {
        log::info!("converting to grayscale before thresholding");
        return Ok(color::gray_from_rgb(&image)?);
    }
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.output.is_none() && !matches!(args.op, Op::Histogram(_)) {
        return Err("missing --output".into());
    }

    // read the image
    let image = io::read_image_any(&args.input)?;
    log::info!(
        "loaded {} ({}, {} channels)",
        args.input.display(),
        image.size(),
        image.num_channels()
    );

    let transformed = match args.op {
        Op::Histogram(_) => {
            for (ch, hist) in histogram::compute_histograms(&image)?.iter().enumerate() {
                let counts = hist
                    .counts()
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>();
                println!("channel {ch}: {}", counts.join(" "));
            }
            return Ok(());
        }
        Op::EqualizeGray(_) => histogram::equalize_grayscale(&image)?,
        Op::EqualizeYcrcb(_) => histogram::equalize_ycrcb(&image)?,
        Op::Normalize(opts) => normalize::normalize_min_max(&image, opts.low, opts.high)?,
        Op::Gamma(opts) => enhance::gamma_correction(&image, opts.gamma)?,
        Op::Gray(_) => color::gray_from_rgb(&image)?,
        Op::Binary(opts) => {
            let gray = binarization_input(image, args.auto_gray)?;
            threshold::threshold_binary(&gray, opts.thresh)?
        }
        Op::Otsu(_) => {
            let gray = binarization_input(image, args.auto_gray)?;
            let (mask, t) = threshold::otsu_threshold(&gray)?;
            log::info!("otsu threshold: {t}");
            mask
        }
        Op::Niblack(opts) => {
            let gray = binarization_input(image, args.auto_gray)?;
            threshold::niblack_threshold(&gray, opts.kernel_size, opts.k)?
        }
        Op::Convolve(opts) => {
            log::info!("convolving with {}", opts.kernel);
            filter::convolve(&image, &kernels::kernel_for(opts.kernel))?
        }
        Op::BoxBlur(_) => filter::box_blur(&image)?,
        Op::GaussianBlur(_) => filter::gaussian_blur(&image)?,
        Op::Median(opts) => filter::median_blur(&image, opts.kernel_size)?,
        Op::Kuwahara(opts) => {
            let mut image = image;
            filter::kuwahara(&mut image, opts.kernel_size)?;
            image
        }
    };

    // write the result
    if let Some(output) = args.output {
        io::write_image_any(&output, &transformed)?;
        log::info!("saved {}", output.display());
    }

    Ok(())
}
