use chrono::{Duration, Utc};
use sm2::{
    ItemSchedulingState, ReviewOutcome, Scheduler, estimate_quality, select_due,
};

fn schedule_new_item() {
    let scheduler = Scheduler::sm2();

    // A brand-new item, answered correctly in 1.4 seconds
    let item = scheduler.initial_state();
    let outcome = ReviewOutcome::new(true, 1400);
    println!("Quality: {}", outcome.quality());

    let item = scheduler.review(&item, outcome, Some(Utc::now()));
    println!("Interval: {} days", item.interval_days);
    println!("Ease factor: {:.2}", item.ease_factor);
    println!("Mastery: {}", item.mastery_level());
    println!("Next review due: {:?}", item.next_review_at());
}

fn schedule_existing_item() {
    let scheduler = Scheduler::sm2();

    // Reviewed 16 days ago after a three-review streak
    let item = ItemSchedulingState {
        ease_factor: 2.6,
        interval_days: 16,
        repetition_count: 3,
        last_quality: Some(4),
        last_reviewed_at: Some(Utc::now() - Duration::days(16)),
    };
    println!("Due now: {}", item.is_due(Utc::now()));

    for (label, correct, latency) in [("fast", true, 700), ("slow", true, 6000), ("wrong", false, 3000)] {
        let quality = estimate_quality(correct, latency);
        let next = scheduler.review_with_quality(&item, quality, None);
        println!(
            "{label:>5}: quality {quality}, interval {} days, mastery {}",
            next.interval_days,
            next.mastery_level()
        );
    }
}

fn build_review_queue() {
    let now = Utc::now();
    let items = [
        ("가", ItemSchedulingState::new()),
        (
            "나",
            ItemSchedulingState {
                ease_factor: 2.5,
                interval_days: 6,
                repetition_count: 2,
                last_quality: Some(4),
                last_reviewed_at: Some(now - Duration::days(7)),
            },
        ),
        (
            "다",
            ItemSchedulingState {
                ease_factor: 2.7,
                interval_days: 40,
                repetition_count: 5,
                last_quality: Some(5),
                last_reviewed_at: Some(now - Duration::days(3)),
            },
        ),
    ];
    let due = select_due(&items, now);
    println!(
        "Due for review: {:?}",
        due.iter().map(|(word, _)| *word).collect::<Vec<_>>()
    );
}

fn main() {
    println!("Scheduling a new item:");
    schedule_new_item();

    println!("\nScheduling an existing item:");
    schedule_existing_item();

    println!("\nBuilding a review queue:");
    build_review_queue();
}
