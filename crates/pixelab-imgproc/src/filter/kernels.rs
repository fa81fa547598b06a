use std::{fmt, str::FromStr};

use pixelab_image::ImageError;

/// A 3x3 matrix of integer weights, applied as a correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Kernel([[i32; 3]; 3]);

impl Kernel {
    /// Create a kernel from its three rows, top to bottom.
    pub const fn from_rows(rows: [[i32; 3]; 3]) -> Self {
        Self(rows)
    }

    /// The rows of the kernel.
    pub fn rows(&self) -> &[[i32; 3]; 3] {
        &self.0
    }

    /// The nine weights in row-major order, as f32.
    pub fn weights(&self) -> [f32; 9] {
        let mut weights = [0.0; 9];
        for (dst, &w) in weights.iter_mut().zip(self.0.iter().flatten()) {
            *dst = w as f32;
        }
        weights
    }

    /// The sum of the weights.
    pub fn sum(&self) -> i32 {
        self.0.iter().flatten().sum()
    }
}

/// The named entries of the kernel bank, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KernelName {
    Identity,
    Prewitt0,
    Prewitt45,
    Prewitt90,
    Prewitt135,
    Prewitt180,
    Prewitt225,
    Prewitt270,
    Prewitt315,
    Sobel0,
    Sobel45,
    Sobel90,
    Sobel135,
    Sobel180,
    Sobel225,
    Sobel270,
    Sobel315,
    Laplace1,
    Laplace2,
    Laplace3,
    EdgeDetection1,
    EdgeDetection2,
    EdgeDetection3,
    EdgeDetection4,
}

impl KernelName {
    /// Every entry of the bank, indexed by [`KernelName::index`].
    pub const ALL: [KernelName; 24] = [
        KernelName::Identity,
        KernelName::Prewitt0,
        KernelName::Prewitt45,
        KernelName::Prewitt90,
        KernelName::Prewitt135,
        KernelName::Prewitt180,
        KernelName::Prewitt225,
        KernelName::Prewitt270,
        KernelName::Prewitt315,
        KernelName::Sobel0,
        KernelName::Sobel45,
        KernelName::Sobel90,
        KernelName::Sobel135,
        KernelName::Sobel180,
        KernelName::Sobel225,
        KernelName::Sobel270,
        KernelName::Sobel315,
        KernelName::Laplace1,
        KernelName::Laplace2,
        KernelName::Laplace3,
        KernelName::EdgeDetection1,
        KernelName::EdgeDetection2,
        KernelName::EdgeDetection3,
        KernelName::EdgeDetection4,
    ];

    /// Position of the entry in the catalog.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable name, e.g. `Sobel 45 deg`.
    pub fn label(self) -> &'static str {
        match self {
            KernelName::Identity => "Default",
            KernelName::Prewitt0 => "Prewitt 0 deg",
            KernelName::Prewitt45 => "Prewitt 45 deg",
            KernelName::Prewitt90 => "Prewitt 90 deg",
            KernelName::Prewitt135 => "Prewitt 135 deg",
            KernelName::Prewitt180 => "Prewitt 180 deg",
            KernelName::Prewitt225 => "Prewitt 225 deg",
            KernelName::Prewitt270 => "Prewitt 270 deg",
            KernelName::Prewitt315 => "Prewitt 315 deg",
            KernelName::Sobel0 => "Sobel 0 deg",
            KernelName::Sobel45 => "Sobel 45 deg",
            KernelName::Sobel90 => "Sobel 90 deg",
            KernelName::Sobel135 => "Sobel 135 deg",
            KernelName::Sobel180 => "Sobel 180 deg",
            KernelName::Sobel225 => "Sobel 225 deg",
            KernelName::Sobel270 => "Sobel 270 deg",
            KernelName::Sobel315 => "Sobel 315 deg",
            KernelName::Laplace1 => "Laplace 1",
            KernelName::Laplace2 => "Laplace 2",
            KernelName::Laplace3 => "Laplace 3",
            KernelName::EdgeDetection1 => "Edge Detection 1",
            KernelName::EdgeDetection2 => "Edge Detection 2",
            KernelName::EdgeDetection3 => "Edge Detection 3",
            KernelName::EdgeDetection4 => "Edge Detection 4",
        }
    }
}

impl fmt::Display for KernelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<usize> for KernelName {
    type Error = ImageError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            ImageError::InvalidParameter(
                "kernel",
                format!("index must be below {}, got {index}", Self::ALL.len()),
            )
        })
    }
}

impl FromStr for KernelName {
    type Err = ImageError;

    /// Parse a catalog index or a label. Labels match case-insensitively and
    /// ignore spaces, dashes and underscores, so `sobel-45-deg` and `Sobel45` both
    /// name [`KernelName::Sobel45`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.trim().parse::<usize>() {
            return Self::try_from(index);
        }

        let squash = |s: &str| {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        };
        let wanted = squash(s);
        let wanted = wanted.strip_suffix("deg").unwrap_or(wanted.as_str());

        Self::ALL
            .iter()
            .copied()
            .find(|name| {
                let label = squash(name.label());
                let label = label.strip_suffix("deg").unwrap_or(label.as_str());
                label == wanted || (*name == KernelName::Identity && wanted == "identity")
            })
            .ok_or_else(|| ImageError::InvalidParameter("kernel", format!("unknown name {s:?}")))
    }
}

/// Look up the weights of a kernel of the bank.
///
/// The first entry is the identity, the edge and derivative kernels are not normalized.
///
/// # Example
///
/// ```
/// use pixelab_imgproc::filter::kernels::{kernel_for, KernelName};
///
/// let sobel = kernel_for(KernelName::Sobel0);
/// assert_eq!(sobel.rows(), &[[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]);
/// assert_eq!(sobel.sum(), 0);
/// ```
pub fn kernel_for(name: KernelName) -> Kernel {
    let rows = match name {
        KernelName::Identity => [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
        KernelName::Prewitt0 => [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]],
        KernelName::Prewitt45 => [[0, 1, 1], [-1, 0, 1], [-1, -1, 0]],
        KernelName::Prewitt90 => [[1, 1, 1], [0, 0, 0], [-1, -1, -1]],
        KernelName::Prewitt135 => [[1, 1, 0], [1, 0, -1], [0, -1, -1]],
        KernelName::Prewitt180 => [[1, 0, -1], [1, 0, -1], [1, 0, -1]],
        KernelName::Prewitt225 => [[0, -1, -1], [1, 0, -1], [1, 1, 0]],
        KernelName::Prewitt270 => [[-1, -1, -1], [0, 0, 0], [1, 1, 1]],
        KernelName::Prewitt315 => [[-1, -1, 0], [-1, 0, 1], [0, 1, 1]],
        KernelName::Sobel0 => [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]],
        KernelName::Sobel45 => [[0, 1, 2], [-1, 0, 1], [-2, -1, 0]],
        KernelName::Sobel90 => [[1, 2, 1], [0, 0, 0], [-1, -2, -1]],
        KernelName::Sobel135 => [[2, 1, 0], [1, 0, -1], [0, -1, -2]],
        KernelName::Sobel180 => [[1, 0, -1], [2, 0, -2], [1, 0, -1]],
        KernelName::Sobel225 => [[0, -1, -2], [1, 0, -1], [2, 1, 0]],
        KernelName::Sobel270 => [[-1, -2, -1], [0, 0, 0], [1, 2, 1]],
        KernelName::Sobel315 => [[-2, -1, 0], [-1, 0, 1], [0, 1, 2]],
        KernelName::Laplace1 => [[0, -1, 0], [-1, 4, -1], [0, -1, 0]],
        KernelName::Laplace2 => [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]],
        KernelName::Laplace3 => [[1, -2, 1], [-2, 4, -2], [1, -2, 1]],
        KernelName::EdgeDetection1 => [[1, 1, 1], [1, -2, -1], [1, -1, -1]],
        KernelName::EdgeDetection2 => [[1, 1, 1], [-1, -2, 1], [-1, -1, 1]],
        KernelName::EdgeDetection3 => [[1, -1, -1], [1, -2, -1], [1, 1, 1]],
        KernelName::EdgeDetection4 => [[-1, -1, 1], [-1, -2, 1], [1, 1, 1]],
    };
    Kernel(rows)
}

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel, each tap weighs `1 / kernel_size`.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// The sigma used for a gaussian kernel of the given size when none is specified.
///
/// `sigma = 0.3 * ((kernel_size - 1) / 2 - 1) + 0.8`
pub fn gaussian_sigma(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum 1.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order() {
        for (i, name) in KernelName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
            assert_eq!(KernelName::try_from(i).ok(), Some(*name));
        }
        assert!(KernelName::try_from(24).is_err());
    }

    #[test]
    fn edge_kernels_sum_to_zero() {
        for name in &KernelName::ALL[1..] {
            assert_eq!(kernel_for(*name).sum(), 0, "{name}");
        }
        assert_eq!(kernel_for(KernelName::Identity).sum(), 1);
    }

    #[test]
    fn rotations_are_negations() {
        // a rotation by 180 degrees flips the sign of a first derivative
        let pairs = [
            (KernelName::Prewitt0, KernelName::Prewitt180),
            (KernelName::Prewitt45, KernelName::Prewitt225),
            (KernelName::Sobel90, KernelName::Sobel270),
            (KernelName::Sobel135, KernelName::Sobel315),
        ];
        for (a, b) in pairs {
            let a = kernel_for(a).weights();
            let b = kernel_for(b).weights();
            assert!(a.iter().zip(b.iter()).all(|(x, y)| *x == -*y));
        }
    }

    #[test]
    fn parse_kernel_names() {
        assert_eq!("Sobel 45 deg".parse::<KernelName>().ok(), Some(KernelName::Sobel45));
        assert_eq!("sobel-45".parse::<KernelName>().ok(), Some(KernelName::Sobel45));
        assert_eq!("laplace_2".parse::<KernelName>().ok(), Some(KernelName::Laplace2));
        assert_eq!("default".parse::<KernelName>().ok(), Some(KernelName::Identity));
        assert_eq!("identity".parse::<KernelName>().ok(), Some(KernelName::Identity));
        assert_eq!("9".parse::<KernelName>().ok(), Some(KernelName::Sobel0));
        assert!("sobel 46".parse::<KernelName>().is_err());
        assert!("31".parse::<KernelName>().is_err());
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (i, &k) in kernel.iter().enumerate() {
            approx::assert_relative_eq!(k, expected[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn gaussian_sigma_from_size() {
        approx::assert_relative_eq!(gaussian_sigma(5), 1.1, epsilon = 1e-6);
        approx::assert_relative_eq!(gaussian_sigma(3), 0.8, epsilon = 1e-6);

        let kernel = gaussian_kernel_1d(5, gaussian_sigma(5));
        approx::assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);

        // sampled taps, not the binomial [1, 4, 6, 4, 1] / 16 of OpenCV
        approx::assert_relative_eq!(kernel[0], 0.0708, epsilon = 1e-3);
        approx::assert_relative_eq!(kernel[1], 0.2445, epsilon = 1e-3);
        approx::assert_relative_eq!(kernel[2], 0.3695, epsilon = 1e-3);
        assert!(kernel[0] > 1.0 / 16.0 && kernel[2] < 6.0 / 16.0);
    }
}
