//! Recycling of entities that scrolled off the left edge.
//!
//! Nothing is ever destroyed : a rock or droplet that leaves the screen is
//! moved back in front of the player, under the same spacing rules the
//! level generator uses. Collected droplets don't count as neighbours.
//!
//! The two entity kinds give up differently when the attempt cap runs out:
//! - rocks take the last candidate anyway
//! - droplets stay where they are and are retried on the next frame

use crate::layout::{sample, Droplet, LayoutRules, Obstacle, Placement};
use rand::Rng;

/// Move `obstacles[index]` ahead of everything still in play.
/// Always repositions; the returned placement says whether the gaps held.
pub fn recycle_obstacle<R: Rng + ?Sized>(
    index: usize,
    obstacles: &mut [Obstacle],
    droplets: &[Droplet],
    rules: &LayoutRules,
    rng: &mut R,
) -> Placement {
    let others = || {
        obstacles
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
            .map(|(_, rock)| rock)
    };
    let live_droplets = || droplets.iter().filter(|drop| !drop.collected);

    let anchor = others()
        .map(Obstacle::x)
        .chain(live_droplets().map(Droplet::x))
        .fold(rules.width, f32::max);

    let placement = sample(
        rng,
        rules.obstacle_recycle_attempts,
        |rng| anchor + rules.obstacle_gap + rng.gen::<f32>() * rules.obstacle_jitter,
        |x| rules.obstacle_fits(x, others(), live_droplets()),
    );
    obstacles[index].position.x = placement.x;
    placement
}

/// Try to bring `droplets[index]` back just past the right edge.
/// On failure the droplet is left untouched (still off-screen, still
/// flagged collected if it was) so the next frame tries again.
pub fn recycle_droplet<R: Rng + ?Sized>(
    index: usize,
    droplets: &mut [Droplet],
    obstacles: &[Obstacle],
    rules: &LayoutRules,
    rng: &mut R,
) -> Placement {
    let placement = {
        let others = || {
            droplets
                .iter()
                .enumerate()
                .filter(move |(i, drop)| *i != index && !drop.collected)
                .map(|(_, drop)| drop)
        };
        sample(
            rng,
            rules.droplet_recycle_attempts,
            |rng| rules.width + rng.gen::<f32>() * rules.droplet_respawn_window,
            |x| rules.droplet_fits(x, obstacles.iter(), others()),
        )
    };
    if placement.satisfied {
        let drop = &mut droplets[index];
        drop.position.x = placement.x;
        drop.collected = false;
    } else {
        log::debug!("droplet {} found no free slot, retrying next frame", index);
    }
    placement
}
