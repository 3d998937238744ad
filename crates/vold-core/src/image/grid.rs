//! Enumeration of discrete grid indices.

/// Iterate over every discrete index of a grid of the given size, index
/// axis 0 fastest. The iteration order matches buffer offsets.
pub fn grid_indices<const D: usize>(size: [usize; D]) -> impl Iterator<Item = [usize; D]> {
    let total: usize = size.iter().product();
    (0..total).map(move |mut linear| {
        let mut index = [0usize; D];
        for axis in 0..D {
            index[axis] = linear % size[axis];
            linear /= size[axis];
        }
        index
    })
}
