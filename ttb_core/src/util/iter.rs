pub trait IterExt: Iterator {
    /// Get the single element of the iterator, if it has exactly one element.
    fn single(self) -> Option<Self::Item>;
}

impl<I: Iterator> IterExt for I {
    fn single(mut self) -> Option<Self::Item> {
        self.try_fold(None, |a, x| match a {
            None => Ok(Some(x)),
            Some(_) => Err(()),
        })
        .ok()
        .flatten()
    }
}
