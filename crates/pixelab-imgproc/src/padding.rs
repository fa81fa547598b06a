/// A border type for the windowed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,
}

/// The border policy shared by every windowed operation of this crate:
/// convolution, box and gaussian blur, median and Niblack thresholding.
pub const BORDER_MODE: PaddingMode = PaddingMode::Reflect101;

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else if i >= len {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else if i >= len {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Reflect101`: mirror excluding edge
    ///
    /// PRECONDITION: `len > 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use pixelab_imgproc::padding::PaddingMode;
    ///
    /// assert_eq!(PaddingMode::Reflect101.map_index(-1, 4), 1);
    /// assert_eq!(PaddingMode::Reflect.map_index(-1, 4), 0);
    /// assert_eq!(PaddingMode::Replicate.map_index(5, 4), 3);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect => Self::reflect(i, len),
            PaddingMode::Reflect101 => Self::reflect101(i, len),
        }
    }

    /// Precompute the source indices visited by a centered window of `kernel_size` taps
    /// sliding over a dimension of `len` samples.
    ///
    /// The entry `i * kernel_size + k` holds the mapped index of tap `k` for the output
    /// position `i`.
    pub fn window_indices(&self, len: usize, kernel_size: usize) -> Vec<usize> {
        let half = (kernel_size / 2) as isize;
        let mut indices = Vec::with_capacity(len * kernel_size);
        for i in 0..len as isize {
            for k in 0..kernel_size as isize {
                indices.push(self.map_index(i + k - half, len));
            }
        }
        indices
    }
}
