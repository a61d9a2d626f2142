use lazy_link::{ Context, InitPayload, Value };
use crate::fixtures::{ widget_loader, Probe, RecordingLoader, Widget };
use crate::placeholder::{ placeholder, placeholder_with };

#[test]
fn init_carries_the_attached_handle() {

	let probe = Probe::new();
	let mut placeholder = placeholder( RecordingLoader::new( widget_loader( &probe )));
	let init = placeholder.record_init();

	placeholder.directive.set_module_name( "mod#Widget" );
	placeholder.directive.after_view_init();
	placeholder.run();

	let init = init.borrow();
	assert_eq!( init.len(), 1 );
	let handle = init[0].as_ref().unwrap();
	assert!( placeholder.directive.handle().is_some_and(| stored | stored.ptr_eq( handle )));

	// The consumer binds its context through the emitted handle
	handle.next( Context::new().with_input( "label", "from init" ));
	let label = handle.component_ref().with_instance(| widget: &Widget | widget.label.clone() ).unwrap();
	assert_eq!( label, Some( Value::from( "from init" )));

}

#[test]
fn silent_init_keeps_the_handle_internal() {

	let probe = Probe::new();
	let mut placeholder = placeholder_with( RecordingLoader::new( widget_loader( &probe )), InitPayload::Silent );
	let init = placeholder.record_init();

	placeholder.directive.set_module_name( "mod#Widget" );
	placeholder.directive.after_view_init();
	placeholder.run();

	assert_eq!( init.borrow().len(), 1 );
	assert!( init.borrow()[0].is_none() );
	let handle = placeholder.directive.handle().unwrap();

	placeholder.directive.destroy();
	assert!( handle.is_detached() );
	assert!( placeholder.container.is_empty() );

}
