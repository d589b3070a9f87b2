//! Sprite sequence selection
//!
//! Each entity owns an `AnimationState` over its own clip enum. The
//! simulation only tracks which clip is playing and its frame index;
//! mapping clips to actual images is the renderer's job.

use serde::{Deserialize, Serialize};

/// A named sprite sequence
pub trait Clip: Copy + PartialEq {
    /// Number of frames in the sequence (at least 1)
    fn frames(self) -> u32;

    /// Looping clips wrap; one-shot clips hold their last frame
    fn looping(self) -> bool {
        true
    }

    /// Sprite sheet name used by the renderer
    fn sheet(self) -> &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationState<C> {
    clip: C,
    frame: u32,
}

impl<C: Clip> AnimationState<C> {
    pub fn new(clip: C) -> Self {
        Self { clip, frame: 0 }
    }

    pub fn clip(&self) -> C {
        self.clip
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Switch clip; restarts from frame 0 only when the clip changes
    pub fn play(&mut self, clip: C) {
        if self.clip != clip {
            self.clip = clip;
            self.frame = 0;
        }
    }

    /// Advance one animation frame
    pub fn advance(&mut self) {
        let frames = self.clip.frames().max(1);
        if self.clip.looping() {
            self.frame = (self.frame + 1) % frames;
        } else {
            self.frame = (self.frame + 1).min(frames - 1);
        }
    }

    /// One-shot clip has reached its final frame
    pub fn finished(&self) -> bool {
        !self.clip.looping() && self.frame + 1 >= self.clip.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum TestClip {
        Loop,
        Once,
    }

    impl Clip for TestClip {
        fn frames(self) -> u32 {
            match self {
                TestClip::Loop => 3,
                TestClip::Once => 2,
            }
        }

        fn looping(self) -> bool {
            self == TestClip::Loop
        }

        fn sheet(self) -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_looping_wraps() {
        let mut anim = AnimationState::new(TestClip::Loop);
        for _ in 0..3 {
            anim.advance();
        }
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_one_shot_holds_last_frame() {
        let mut anim = AnimationState::new(TestClip::Once);
        for _ in 0..5 {
            anim.advance();
        }
        assert_eq!(anim.frame(), 1);
        assert!(anim.finished());
    }

    #[test]
    fn test_play_same_clip_keeps_frame() {
        let mut anim = AnimationState::new(TestClip::Loop);
        anim.advance();
        anim.play(TestClip::Loop);
        assert_eq!(anim.frame(), 1);
        anim.play(TestClip::Once);
        assert_eq!(anim.frame(), 0);
    }
}
