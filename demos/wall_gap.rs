use astar_visualizer::{InputEvent, MouseButton, Visualizer, VisualizerConfig};
use std::ops::ControlFlow;

// Drives the visualizer with clicks the way a window would: place start and end, draw a
// wall with a single gap, then search. The frame counter stands in for redraws.

fn click(x: u32, y: u32) -> InputEvent {
    InputEvent::Click {
        button: MouseButton::Left,
        x,
        y,
    }
}

fn main() {
    let config = VisualizerConfig {
        rows: 10,
        width: 100,
        ..VisualizerConfig::default()
    };
    let mut visualizer = Visualizer::new(config).unwrap();
    let mut events = vec![click(5, 5), click(95, 95)];
    // A horizontal wall on row 5, leaving column 7 open.
    events.extend((0..10).filter(|&c| c != 7).map(|c| click(c * 10 + 5, 55)));
    events.push(InputEvent::Search);

    let mut frames = 0;
    for event in events {
        let run = visualizer
            .handle(event, |_| {
                frames += 1;
                ControlFlow::Continue(())
            })
            .unwrap();
        if let Some(run) = run {
            println!("{:?}, {} redraws", run.outcome.path().map(|p| p.len()), frames);
        }
    }
    print!("{}", visualizer.grid());
}
