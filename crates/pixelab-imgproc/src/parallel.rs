use rayon::prelude::*;

use pixelab_image::PixelBuffer;

/// Apply a function to each pixel in the image in parallel.
///
/// The closure receives the channels of the source pixel and of the matching
/// destination pixel, so source and destination may differ in channel count.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn par_iter_rows(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    f: impl Fn(&[u8], &mut [u8]) + Send + Sync,
) {
    if src.is_empty() {
        return;
    }

    let (c1, c2) = (src.num_channels(), dst.num_channels());
    let (src_stride, dst_stride) = (src.row_stride(), dst.row_stride());

    src.as_slice()
        .par_chunks_exact(src_stride)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(dst_stride))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(c1)
                .zip(dst_chunk.chunks_exact_mut(c2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel.
///
/// PRECONDITION: `src` and `dst` must have the same size and number of channels.
pub fn par_iter_rows_val(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    f: impl Fn(&u8, &mut u8) + Send + Sync,
) {
    if src.is_empty() {
        return;
    }

    let stride = src.row_stride();

    src.as_slice()
        .par_chunks_exact(stride)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(stride))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Fill each row of a destination slice in parallel.
///
/// The closure receives the row index and the mutable row. This is used by the
/// windowed operations, which read a shared source and write independent rows.
pub fn par_rows_mut<T: Send>(
    dst: &mut [T],
    row_stride: usize,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) {
    if row_stride == 0 {
        return;
    }

    dst.par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(row, dst_row)| f(row, dst_row));
}
