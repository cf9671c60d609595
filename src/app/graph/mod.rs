mod build;
mod interaction;
mod view;

pub(in crate::app) use self::interaction::{GestureMode, PointerEvent};
