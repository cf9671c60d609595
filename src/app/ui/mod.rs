mod details;
mod fps;
mod panels;
mod search;
