//! Whatever the call order, the background paints first, frames next and
//! interactive layers last.
use artsy_capture::config::EditorConfig;
use artsy_capture::loader::DecodedImage;
use artsy_capture::scene::{FrameKind, LayerId, LayerRole, Vec2};
use artsy_capture::session::SceneSession;
use artsy_capture::surface::HeadlessHost;
use artsy_capture::types::ViewportHint;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Background,
    Sticker,
    Frame(FrameKind),
    Stroke(f32, f32),
    ToFront(usize),
    ToBack(usize),
    Forward(usize),
    Backward(usize),
    Delete,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Background),
        Just(Op::Sticker),
        prop_oneof![Just(FrameKind::Polaroid), Just(FrameKind::Border)].prop_map(Op::Frame),
        (0.0f32..400.0, 0.0f32..300.0).prop_map(|(x, y)| Op::Stroke(x, y)),
        (0usize..8).prop_map(Op::ToFront),
        (0usize..8).prop_map(Op::ToBack),
        (0usize..8).prop_map(Op::Forward),
        (0usize..8).prop_map(Op::Backward),
        Just(Op::Delete),
    ]
}

fn nth(session: &SceneSession<HeadlessHost>, n: usize) -> Option<LayerId> {
    let layers = session.scene().layers();
    (!layers.is_empty()).then(|| layers[n % layers.len()].id)
}

fn band(role: LayerRole) -> u8 {
    match role {
        LayerRole::Background => 0,
        LayerRole::Frame(_) => 1,
        LayerRole::Sticker | LayerRole::Stroke => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_bands_stay_ordered(ops in prop::collection::vec(op(), 1..24)) {
        let mut session = SceneSession::new(HeadlessHost::new(), EditorConfig::default());
        session.initialize(ViewportHint::new(480.0, 500.0)).unwrap();
        let image = DecodedImage::solid(40, 30, [10, 120, 200, 255]).unwrap();

        for op in ops {
            let ticket = session.ticket().unwrap();
            match op {
                Op::Background => { session.set_background(ticket, image.clone()).unwrap(); }
                Op::Sticker => { session.add_layer(ticket, image.clone()).unwrap(); }
                Op::Frame(kind) => { session.add_decorative_frame(kind).unwrap(); }
                Op::Stroke(x, y) => {
                    session.set_draw_mode(true);
                    session.pointer_down(Vec2::new(x, y));
                    session.pointer_up(Vec2::new(x + 10.0, y + 5.0));
                    session.set_draw_mode(false);
                }
                Op::ToFront(n) => if let Some(id) = nth(&session, n) { session.bring_to_front(id) },
                Op::ToBack(n) => if let Some(id) = nth(&session, n) { session.send_to_back(id) },
                Op::Forward(n) => if let Some(id) = nth(&session, n) { session.bring_forward(id) },
                Op::Backward(n) => if let Some(id) = nth(&session, n) { session.send_backward(id) },
                Op::Delete => { session.remove_active_layer(); }
            }

            let bands: Vec<u8> = session.scene().render_order().map(|l| band(l.role)).collect();
            prop_assert!(bands.windows(2).all(|w| w[0] <= w[1]), "bands out of order: {:?}", bands);
            prop_assert!(bands.iter().filter(|&&b| b == 0).count() <= 1);
        }
    }
}
