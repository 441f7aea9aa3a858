/// Generate accessors for the thread-local presentation signals.
///
/// Each entry names the accessor and the `SeriesSignals` field it returns:
/// `global_signals! { pub current_price_signal => current_price: Option<f64> }`
#[macro_export]
macro_rules! global_signals {
    ( $( $vis:vis $name:ident => $field:ident : $ty:ty ),+ $(,)? ) => {
        $(
            $vis fn $name() -> ::leptos::RwSignal<$ty> {
                $crate::presentation::signals::globals().$field
            }
        )+
    };
}
