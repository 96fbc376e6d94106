mod control;
mod download;
mod health;
mod status;

macros_utils::routes! {
    route health::health_route,
    route control::start_route,
    route control::stop_route,
    route status::status_route,
    route download::download_route,
}

#[cfg(test)]
mod tests;
