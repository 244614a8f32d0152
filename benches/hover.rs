use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mirror_resize::logging::{LogEvent, LogSink};
use mirror_resize::{
    ClassRole, DragController, DragLoggerPlugin, DragOverEvent, DraggableOptions, ElementId,
    Logger, LoggingResult, MirrorResizer, Rect, RenderTree, Result,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const ITEMS: usize = 64;

struct Board {
    controller: DragController,
    container: ElementId,
    mirror: ElementId,
    items: Vec<ElementId>,
}

fn build_board() -> Result<Board> {
    let options = DraggableOptions::default().with_draggable("li.card");
    let marker = options.class_name_for(ClassRole::SourceOriginal).to_string();

    let mut tree = RenderTree::new();
    let root = tree.root();
    let container = tree.create_element("ul");
    tree.append_child(root, container)?;
    let mirror = tree.create_element("div");
    tree.append_child(root, mirror)?;

    let mut items = Vec::with_capacity(ITEMS);
    for idx in 0..ITEMS {
        let li = tree.create_element("li");
        tree.add_class(li, "card")?;
        tree.append_child(container, li)?;
        let height = 20.0 + (idx % 7) as f64 * 10.0;
        tree.set_rect(li, Rect::new(0.0, idx as f64 * 80.0, 240.0, height))?;
        items.push(li);
    }
    tree.add_class(items[0], &marker)?;

    let mut controller = DragController::new(tree, options);
    let logger = Logger::new(NullSink);
    {
        let config = controller.config_mut();
        config.logger = Some(logger.clone());
        config.enable_metrics();
    }
    let resizer = MirrorResizer::new(&controller)?;
    controller.add_plugin(resizer);
    controller.add_plugin(DragLoggerPlugin::new(logger));

    Ok(Board {
        controller,
        container,
        mirror,
        items,
    })
}

fn hover_storm(c: &mut Criterion) {
    c.bench_function("hover_storm_double_frame", |b| {
        b.iter(|| {
            let mut board = build_board().expect("board");
            for item in board.items.iter().copied() {
                let event = DragOverEvent::over(item, board.container, board.mirror);
                board.controller.emit(black_box(&event));
            }
            board.controller.run_until_idle(4);
        });
    });
}

fn container_fallback(c: &mut Criterion) {
    c.bench_function("container_fallback", |b| {
        b.iter(|| {
            let mut board = build_board().expect("board");
            let event = DragOverEvent::over_container(board.container, board.mirror);
            for _ in 0..ITEMS {
                board.controller.emit(black_box(&event));
                board.controller.run_frame();
            }
            board.controller.run_until_idle(4);
        });
    });
}

criterion_group!(benches, hover_storm, container_fallback);
criterion_main!(benches);
