mod files;
mod issues;
mod navigation;
mod startup;
mod system;
