/// Identity of one camera animation (a spin step or a scripted flight).
///
/// Issued in increasing order so a settle event can be matched against the
/// animation that is currently running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn new(n: u64) -> Self {
        AnimationId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        AnimationId(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}
