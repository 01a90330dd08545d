use std::cell::RefCell;
use std::rc::Rc;

use sticky_testing::StickyTestRule;
use sticky_ui::{
    ChildRole, LeafChild, Point, Size, StickyHeaderNode, StickyHeaderSpec, StickySection,
};

const WIDTH: f32 = 320.0;
const HEADER: f32 = 50.0;
const CONTENT: f32 = 400.0;

fn header_id(section: usize) -> usize {
    section * 10
}

fn content_id(section: usize) -> usize {
    section * 10 + 1
}

fn sections(rule: &mut StickyTestRule, count: usize, first_spec: StickyHeaderSpec) {
    rule.set_content(move |env| {
        (0..count)
            .map(|index| {
                let spec = if index == 0 {
                    first_spec.clone()
                } else {
                    StickyHeaderSpec::new()
                };
                Box::new(
                    StickyHeaderNode::new(
                        spec,
                        Box::new(LeafChild::new(header_id(index), Size::new(WIDTH, HEADER))),
                        Box::new(LeafChild::new(content_id(index), Size::new(WIDTH, CONTENT))),
                        env.scroll.clone(),
                    )
                    .unwrap(),
                ) as Box<dyn StickySection>
            })
            .collect()
    });
}

#[test]
fn header_approaches_sticks_and_is_pushed_out() {
    let mut rule = StickyTestRule::new(Size::new(WIDTH, 600.0)).with_before_padding(1000.0);
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = emitted.clone();
    sections(
        &mut rule,
        3,
        StickyHeaderSpec::new().on_stuck_amount_changed(move |v| sink.borrow_mut().push(v)),
    );
    assert_eq!(rule.scroll_state().max_value(), 1750.0);

    rule.scroll_to(940.0);
    rule.scroll_to(980.0);
    let paint = rule.paint();
    assert_eq!(paint.origin_of(header_id(0)), Some(Point::new(0.0, 20.0)));

    rule.scroll_to(1000.0);
    rule.scroll_to(1300.0);
    let paint = rule.paint();
    assert_eq!(paint.origin_of(header_id(0)), Some(Point::new(0.0, 0.0)));
    assert_eq!(paint.origin_of(content_id(0)), Some(Point::new(0.0, -250.0)));

    rule.scroll_to(1370.0);
    let paint = rule.paint();
    assert_eq!(paint.origin_of(header_id(0)), Some(Point::new(0.0, -20.0)));

    let emitted = emitted.borrow();
    assert_eq!(emitted.len(), 4, "emitted {:?}", *emitted);
    assert_eq!(emitted[0], 1.0);
    assert!((emitted[1] - 0.4).abs() < 1e-6);
    assert_eq!(emitted[2], 0.0);
    assert!((emitted[3] + 0.4).abs() < 1e-6);
}

#[test]
fn headers_paint_above_their_content() {
    let mut rule = StickyTestRule::new(Size::new(WIDTH, 600.0));
    sections(&mut rule, 3, StickyHeaderSpec::new());
    rule.scroll_to(200.0);

    let painted = rule.paint().painted_nodes();
    assert_eq!(
        painted,
        vec![content_id(0), header_id(0), content_id(1), header_id(1)]
    );
}

#[test]
fn pinned_header_takes_the_pointer() {
    let mut rule = StickyTestRule::new(Size::new(WIDTH, 600.0));
    sections(&mut rule, 3, StickyHeaderSpec::new());
    rule.scroll_to(300.0);

    // Section 0's content is scrolled under the viewport top, but the header sits there.
    let hit = rule.hit_test(Point::new(20.0, 10.0)).unwrap();
    assert_eq!(hit.section, 0);
    assert_eq!(hit.target.role, ChildRole::Header);
    assert_eq!(hit.target.local, Point::new(20.0, 10.0));

    let hit = rule.hit_test(Point::new(20.0, 60.0)).unwrap();
    assert_eq!(hit.section, 0);
    assert_eq!(hit.target.role, ChildRole::Content);
    assert_eq!(hit.target.local, Point::new(20.0, 310.0));
}

#[test]
fn overlapping_headers_float_over_content() {
    let mut rule = StickyTestRule::new(Size::new(WIDTH, 600.0));
    sections(&mut rule, 3, StickyHeaderSpec::new().overlap_headers(true));

    let placements = &rule.column().stack().placements;
    assert_eq!(placements[0].extent, CONTENT);
    assert_eq!(placements[1].top, CONTENT);

    let paint = rule.paint();
    assert_eq!(paint.origin_of(header_id(0)), Some(Point::new(0.0, 0.0)));
    assert_eq!(paint.origin_of(content_id(0)), Some(Point::new(0.0, 0.0)));
}
