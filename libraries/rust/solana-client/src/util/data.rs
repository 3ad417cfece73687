/// Combine an item of some type with another item of the
/// same type to output a combined item of the same type
pub trait Concat {
    fn cat(self, other: Self) -> Self;
    fn cat_ref(self, other: &Self) -> Self;
}

impl<T: Clone> Concat for Vec<T> {
    fn cat(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }

    fn cat_ref(mut self, other: &Self) -> Self {
        self.extend_from_slice(other);
        self
    }
}

/// joins a collection of items that implement Concat using concat method
#[macro_export]
macro_rules! cat {
    ($concattable:expr) => {
        $concattable
    };
    ($concattable:expr, $($therest:expr),+$(,)?) => {{
        use $crate::util::data::Concat;
        $concattable.cat($crate::cat![$($therest),+])
    }};
}

#[test]
fn cat_vec() {
    let one = vec![1, 2, 3];
    let two = vec![4, 5, 6];
    assert_eq!(one.clone().cat_ref(&two), one.clone().cat(two.clone()));
    assert_eq!(crate::cat![one, two, vec![7]], [1, 2, 3, 4, 5, 6, 7]);
}
